use super::constants::HdbExtensionType;
use super::hdb_key::Keys;
use super::kerberos_time::KerberosTime;
use super::principal::Principal;
use der::asn1::Any;
use der::{Decode, Sequence, Tag, TagNumber, Tagged};

/// ```text
/// HDB-extension ::= SEQUENCE {
///         mandatory[0]    BOOLEAN,        -- kdc MUST understand this extension,
///                                         -- if not the whole entry must
///                                         -- be rejected
///         data[1]         CHOICE { ... },
///         ...
/// }
/// ```
///
/// `data` is held undecoded, see [`HdbExtensionType`] for the alternatives.
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct HdbExtension {
    #[asn1(context_specific = "0")]
    pub(crate) mandatory: bool,
    #[asn1(context_specific = "1")]
    pub(crate) data: Any,
}

impl HdbExtension {
    /// The CHOICE alternative carried in `data`, if it is a context tag.
    pub(crate) fn data_type(&self) -> Option<Result<HdbExtensionType, u32>> {
        match self.data.tag() {
            Tag::ContextSpecific {
                constructed: _,
                number,
            } => {
                let number = u32::from(number.value());
                Some(HdbExtensionType::try_from(number).map_err(|_| number))
            }
            _ => None,
        }
    }

    /// Decode the body of the CHOICE alternative.
    pub(crate) fn decode_data<'a, T>(&'a self) -> der::Result<T>
    where
        T: Decode<'a, Error = der::Error>,
    {
        T::from_der(self.data.value())
    }

    pub(crate) fn new<T: der::Encode>(
        mandatory: bool,
        data_type: HdbExtensionType,
        value: &T,
    ) -> der::Result<Self> {
        let data = Any::new(
            Tag::ContextSpecific {
                constructed: true,
                number: TagNumber(u32::from(data_type)),
            },
            value.to_der()?,
        )?;
        Ok(HdbExtension { mandatory, data })
    }
}

/// ```text
/// HDB-extensions ::= SEQUENCE OF HDB-extension
/// ```
///
/// Held as raw elements so that extensions which are not understood survive
/// a decode and encode untouched.
pub(crate) type HdbExtensions = Vec<Any>;

/// ```text
/// HDB-Ext-Aliases ::= SEQUENCE {
///         case-insensitive[0]     BOOLEAN, -- case insensitive name allowed
///         aliases[1]              SEQUENCE OF Principal -- all names, inc primary
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct HdbExtAliases {
    #[asn1(context_specific = "0")]
    pub(crate) case_insensitive: bool,
    #[asn1(context_specific = "1")]
    pub(crate) aliases: Vec<Principal>,
}

/// ```text
/// HDB_keyset ::= SEQUENCE {
///         kvno[0]         INTEGER (0..4294967295),
///         keys[1]         Keys,
///         set-time[2]     KerberosTime OPTIONAL,  -- time this keyset was created/set
///         ...
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Sequence)]
pub(crate) struct HdbKeyset {
    #[asn1(context_specific = "0")]
    pub(crate) kvno: u32,
    #[asn1(context_specific = "1")]
    pub(crate) keys: Keys,
    #[asn1(context_specific = "2", optional = "true")]
    pub(crate) set_time: Option<KerberosTime>,
}

/// ```text
/// HDB-Ext-KeySet ::= SEQUENCE OF HDB_keyset
/// ```
pub(crate) type HdbExtKeySet = Vec<HdbKeyset>;
