pub mod authority;
pub mod role;
pub mod role_authority;
pub mod user;
pub mod user_authority;
pub mod user_role;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::authority::{self, Entity as Authority};
    pub use super::role::{self, Entity as Role};
    pub use super::role_authority::{self, Entity as RoleAuthority};
    pub use super::user::{self, Entity as User};
    pub use super::user_authority::{self, Entity as UserAuthority};
    pub use super::user_role::{self, Entity as UserRole};
}
