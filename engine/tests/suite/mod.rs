mod file_scan;
mod properties;
