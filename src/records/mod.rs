pub mod flow_log_record;
pub mod lookup_record;
