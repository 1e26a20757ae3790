mod client;
mod client_field;
mod client_record;
mod phone_number;

pub use client::Client;
pub use client_field::ClientField;
pub use client_record::ClientRecord;
pub use phone_number::PhoneNumber;
