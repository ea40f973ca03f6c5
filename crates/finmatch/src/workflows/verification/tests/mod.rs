mod common;
mod testing;
