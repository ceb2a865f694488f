pub mod log_parser;
