pub mod employee;

pub use employee::{EmployeeUpdate, ListParams, NewAddress, NewContact, NewEmployee};
