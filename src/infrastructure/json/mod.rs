pub mod deadline_repo;
