//! different utility modules used throughout the project
/// tiny module to set up terminal and file logging
pub mod logger;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into
/// sections and read the calculator settings from it
pub mod config_parser;
/// pretty-printed table of terms, shapes and derivatives
pub mod report;
