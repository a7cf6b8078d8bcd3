// Census workbook I/O operations

pub mod audit;
pub mod csv;
pub mod xlsx;
