// Domain value types shared by the reconcilers.

pub mod mac;

pub use mac::MacAddress;
