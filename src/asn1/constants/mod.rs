pub mod encryption_types;
pub mod extension_types;
pub mod princ_name_types;

pub use self::encryption_types::EncryptionType;
pub use self::extension_types::HdbExtensionType;
pub use self::princ_name_types::PrincipalNameType;
