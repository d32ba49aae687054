pub mod belief;
pub mod contest_class;
pub mod contest_type;
pub mod ticket;
