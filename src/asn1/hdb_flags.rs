use der::flagset::flags;

flags! {
    /// ```text
    /// HDBFlags ::= BIT STRING {
    ///         initial(0),                     -- require as-req
    ///         forwardable(1),                 -- may issue forwardable tickets
    ///         proxiable(2),                   -- may issue proxiable tickets
    ///         renewable(3),                   -- may issue renewable tickets
    ///         postdate(4),                    -- may issue postdatable tickets
    ///         server(5),                      -- may be server
    ///         client(6),                      -- may be client
    ///         invalid(7),                     -- entry is invalid
    ///         require-preauth(8),             -- must use preauth
    ///         change-pw(9),                   -- change password service
    ///         require-hwauth(10),             -- must use hwauth
    ///         ok-as-delegate(11),             -- as in TicketFlags
    ///         user-to-user(12),               -- may use user-to-user auth
    ///         immutable(13),                  -- may not be deleted
    ///         trusted-for-delegation(14),     -- Trusted to print forwardabled tickets
    ///         allow-kerberos4(15),            -- Allow Kerberos 4 requests
    ///         allow-digest(16),               -- Allow digest requests
    ///         locked-out(17),                 -- Account is locked out,
    ///                                         -- authentication will be denied
    ///         require-pwchange(18),           -- require a passwd change
    ///         materialize(19),                -- store even if within virtual namespace
    ///         virtual-keys(20),               -- entry stored; keys mostly derived
    ///         virtual(21),                    -- entry not stored; keys always derived
    ///         synthetic(22),                  -- entry not stored; for PKINIT
    ///         no-auth-data-reqd(23),          -- omit PAC from service tickets
    ///         auth-data-reqd(24),             -- include PAC in service tickets
    ///         force-canonicalize(30),         -- force canonicalization
    ///         do-not-store(31)                -- Not to be modified and stored in HDB
    /// }
    /// ```
    // Bits 25 to 29 are unnamed in the schema but are still carried, the
    // flagset decoder drops any bit that has no variant.
    #[repr(u32)]
    pub enum HdbFlags: u32 {
        Initial              = 1 << 0,
        Forwardable          = 1 << 1,
        Proxiable            = 1 << 2,
        Renewable            = 1 << 3,
        Postdate             = 1 << 4,
        Server               = 1 << 5,
        Client               = 1 << 6,
        Invalid              = 1 << 7,
        RequirePreauth       = 1 << 8,
        ChangePw             = 1 << 9,
        RequireHwauth        = 1 << 10,
        OkAsDelegate         = 1 << 11,
        UserToUser           = 1 << 12,
        Immutable            = 1 << 13,
        TrustedForDelegation = 1 << 14,
        AllowKerberos4       = 1 << 15,
        AllowDigest          = 1 << 16,
        LockedOut            = 1 << 17,
        RequirePwchange      = 1 << 18,
        Materialize          = 1 << 19,
        VirtualKeys          = 1 << 20,
        Virtual              = 1 << 21,
        Synthetic            = 1 << 22,
        NoAuthDataReqd       = 1 << 23,
        AuthDataReqd         = 1 << 24,
        Unused25             = 1 << 25,
        Unused26             = 1 << 26,
        Unused27             = 1 << 27,
        Unused28             = 1 << 28,
        Unused29             = 1 << 29,
        ForceCanonicalize    = 1 << 30,
        DoNotStore           = 1 << 31,
    }
}

#[cfg(test)]
mod tests {
    use super::HdbFlags;
    use der::flagset::FlagSet;
    use der::{Decode, Encode};

    #[test]
    fn hdb_flags_named_bits() {
        let flags: FlagSet<HdbFlags> = HdbFlags::Server | HdbFlags::Client;
        let der = flags.to_der().expect("Failed to encode");
        assert_eq!(der, vec![0x03, 0x02, 0x01, 0x06]);
        assert_eq!(
            FlagSet::<HdbFlags>::from_der(&der).expect("Failed to decode"),
            flags
        );
    }

    #[test]
    fn hdb_flags_empty_and_high_bits() {
        let empty = FlagSet::<HdbFlags>::default();
        assert_eq!(empty.to_der().expect("Failed to encode"), vec![0x03, 0x01, 0x00]);

        let blob = hex::decode("03050040000001").expect("Failed to decode sample");
        let flags = FlagSet::<HdbFlags>::from_der(&blob).expect("Failed to decode");
        assert_eq!(flags, HdbFlags::Forwardable | HdbFlags::DoNotStore);
        assert_eq!(flags.to_der().expect("Failed to encode"), blob);
    }

    #[test]
    fn hdb_flags_all_bits_survive() {
        let all = FlagSet::<HdbFlags>::full();
        let der = all.to_der().expect("Failed to encode");
        assert_eq!(der, vec![0x03, 0x05, 0x00, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(FlagSet::<HdbFlags>::from_der(&der).expect("Failed to decode"), all);
    }
}
