pub mod contact;
pub mod mail;
