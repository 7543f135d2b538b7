pub mod address;
pub mod contact;
pub mod employee;

pub use address::{AddressType, EmployeeAddress};
pub use contact::EmployeeContact;
pub use employee::{Employee, EmployeeRecord};
