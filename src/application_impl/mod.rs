mod user_directory_impl;

pub use user_directory_impl::*;
