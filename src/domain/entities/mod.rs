pub mod collection;
pub mod deadline;
pub mod record;
