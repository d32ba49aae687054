pub mod name_utils;
pub mod progress_utils;
pub mod test_utils;
