//! Fixed catalog of authorities and the well-known seed rows, upserted at
//! startup by the service bootstrap routines.

pub struct AuthoritySeed {
    pub method: &'static str,
    pub description: &'static str,
}

pub struct RoleSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub authorities: &'static [&'static str],
}

/// Authority granting unrestricted access; bypasses every authority check.
pub const OWNER_METHOD: &str = "OWNER";

pub const AUTHORITY_CATALOG: &[AuthoritySeed] = &[
    AuthoritySeed { method: OWNER_METHOD, description: "System owner right" },
    AuthoritySeed { method: "READ_ASSET", description: "Read assets" },
    AuthoritySeed { method: "CREATE_ASSET", description: "Create assets" },
    AuthoritySeed { method: "UPDATE_ASSET", description: "Update assets" },
    AuthoritySeed { method: "DELETE_ASSET", description: "Delete assets" },
    AuthoritySeed { method: "READ_CASH_FLOW", description: "Read cash flows" },
    AuthoritySeed { method: "CREATE_CASH_FLOW", description: "Create cash flows" },
    AuthoritySeed { method: "UPDATE_CASH_FLOW", description: "Update cash flows" },
    AuthoritySeed { method: "DELETE_CASH_FLOW", description: "Delete cash flows" },
    AuthoritySeed { method: "CREATE_ATTACHMENT", description: "Create attachments" },
    AuthoritySeed { method: "DELETE_ATTACHMENT", description: "Delete attachments" },
    AuthoritySeed { method: "READ_AUTHORITY", description: "Read authorities" },
    AuthoritySeed { method: "CREATE_AUTHORITY", description: "Create authorities" },
    AuthoritySeed { method: "UPDATE_AUTHORITY", description: "Update authorities" },
    AuthoritySeed { method: "DELETE_AUTHORITY", description: "Delete authorities" },
    AuthoritySeed { method: "READ_ROLE", description: "Read roles" },
    AuthoritySeed { method: "CREATE_ROLE", description: "Create roles" },
    AuthoritySeed { method: "UPDATE_ROLE", description: "Update roles" },
    AuthoritySeed { method: "DELETE_ROLE", description: "Delete roles" },
    AuthoritySeed { method: "READ_USER", description: "Read users" },
    AuthoritySeed { method: "CREATE_USER", description: "Create users" },
    AuthoritySeed { method: "UPDATE_USER", description: "Update users" },
    AuthoritySeed { method: "DELETE_USER", description: "Delete users" },
    AuthoritySeed { method: "EDIT_ROLE_USER", description: "Edit user roles" },
    AuthoritySeed { method: "EDIT_AUTHORITY_USER", description: "Edit user authorities" },
    AuthoritySeed { method: "READ_CITY", description: "Read cities" },
    AuthoritySeed { method: "CREATE_CITY", description: "Create cities" },
    AuthoritySeed { method: "UPDATE_CITY", description: "Update cities" },
    AuthoritySeed { method: "DELETE_CITY", description: "Delete cities" },
    AuthoritySeed { method: "READ_COUNTRY", description: "Read countries" },
    AuthoritySeed { method: "CREATE_COUNTRY", description: "Create countries" },
    AuthoritySeed { method: "UPDATE_COUNTRY", description: "Update countries" },
    AuthoritySeed { method: "DELETE_COUNTRY", description: "Delete countries" },
    AuthoritySeed { method: "READ_CURRENCY", description: "Read currencies" },
    AuthoritySeed { method: "CREATE_CURRENCY", description: "Create currencies" },
    AuthoritySeed { method: "UPDATE_CURRENCY", description: "Update currencies" },
    AuthoritySeed { method: "DELETE_CURRENCY", description: "Delete currencies" },
];

pub const ADMIN_ROLE_SEED: RoleSeed = RoleSeed {
    name: "ADMIN",
    description: "Administrator role",
    authorities: &[
        OWNER_METHOD,
        "READ_ASSET", "CREATE_ASSET", "UPDATE_ASSET", "DELETE_ASSET",
        "READ_CASH_FLOW", "CREATE_CASH_FLOW", "UPDATE_CASH_FLOW", "DELETE_CASH_FLOW",
        "CREATE_ATTACHMENT", "DELETE_ATTACHMENT",
        "READ_AUTHORITY", "CREATE_AUTHORITY", "UPDATE_AUTHORITY", "DELETE_AUTHORITY",
        "READ_ROLE", "CREATE_ROLE", "UPDATE_ROLE", "DELETE_ROLE",
        "READ_USER", "CREATE_USER", "UPDATE_USER", "DELETE_USER",
        "EDIT_ROLE_USER", "EDIT_AUTHORITY_USER",
        "READ_CITY", "CREATE_CITY", "UPDATE_CITY", "DELETE_CITY",
        "READ_COUNTRY", "CREATE_COUNTRY", "UPDATE_COUNTRY", "DELETE_COUNTRY",
        "READ_CURRENCY", "CREATE_CURRENCY", "UPDATE_CURRENCY", "DELETE_CURRENCY",
    ],
};

pub const USER_ROLE_SEED: RoleSeed = RoleSeed {
    name: "USER",
    description: "Internal user role",
    authorities: &["READ_USER"],
};

pub const ROLE_SEEDS: &[&RoleSeed] = &[&ADMIN_ROLE_SEED, &USER_ROLE_SEED];

pub const DEFAULT_ADMIN_USERNAME: &str = "assets";
pub const DEFAULT_ADMIN_FIRST_NAME: &str = "assets";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@deadline.team";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Deadline@777";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_methods_are_unique() {
        let mut methods: Vec<&str> = AUTHORITY_CATALOG.iter().map(|a| a.method).collect();
        methods.sort_unstable();
        methods.dedup();
        assert_eq!(methods.len(), AUTHORITY_CATALOG.len());
    }

    #[test]
    fn test_role_seeds_reference_catalog_methods_only() {
        for seed in ROLE_SEEDS {
            for method in seed.authorities {
                assert!(
                    AUTHORITY_CATALOG.iter().any(|a| a.method == *method),
                    "role seed {} references unknown method {}",
                    seed.name,
                    method
                );
            }
        }
    }

    #[test]
    fn test_admin_seed_covers_the_whole_catalog() {
        for entry in AUTHORITY_CATALOG {
            assert!(
                ADMIN_ROLE_SEED.authorities.contains(&entry.method),
                "ADMIN seed is missing {}",
                entry.method
            );
        }
    }
}
