pub mod normalizer;
pub mod validator;
pub mod virtual_table;

pub use normalizer::{clean_records, clean_revenue, coerce_f64, coerce_string, parse_overall_rows, parse_transaction_lines, RawRecord};
pub use validator::{validate_transaction_lines, RangeStats, ValidationReport, ValidationStats, ValidationWarning};
pub use virtual_table::{build_aggregated_transactions, build_virtual_table, AggregatedTransaction};
