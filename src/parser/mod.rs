//! Input table parser module.

mod table;

pub use table::{
    parse_csv_line, parse_unit_file, template_csv, UnitTableParser, COL_HEIGHT, COL_QTY, COL_TAG,
    COL_WIDTH, REQUIRED_COLUMNS,
};
