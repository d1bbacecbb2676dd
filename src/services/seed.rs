//! Demo accounts created on startup so a fresh deployment can be explored
//! right away.

use tracing::{info, warn};

use super::{ServiceError, UserService};
use crate::api::users::CreateUserRequest;
use crate::database::models::Role;

pub struct DemoAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub last_name: &'static str,
    pub role: Role,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        email: "demo.user@petfriendly.dev",
        password: "DemoPa55!",
        last_name: "User",
        role: Role::User,
    },
    DemoAccount {
        email: "demo.admin@petfriendly.dev",
        password: "AdminPa55!",
        last_name: "Admin",
        role: Role::SuperAdmin,
    },
];

/// Ensure every demo account exists. Accounts already present are left
/// untouched. Returns how many were created.
pub async fn seed_demo_accounts(users: &UserService) -> Result<usize, ServiceError> {
    let mut created = 0;

    for account in &DEMO_ACCOUNTS {
        if users.exists_by_email(account.email).await? {
            info!(email = account.email, "Demo account already present");
            continue;
        }

        let request = CreateUserRequest {
            first_name: "Demo".to_string(),
            last_name: account.last_name.to_string(),
            email: account.email.to_string(),
            password: account.password.to_string(),
            phone: Some("+573000000000".to_string()),
            city: Some("Bogota".to_string()),
            role: Some(account.role),
            active: Some(true),
        };

        match users.create(request, account.role).await {
            Ok(user) => {
                info!(email = account.email, user_id = %user.id, role = %user.role, "Seeded demo account");
                created += 1;
            }
            // Another instance seeded it first.
            Err(ServiceError::BadRequest(_)) => {
                warn!(email = account.email, "Demo account appeared while seeding");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_accounts_pass_registration_rules() {
        for account in &DEMO_ACCOUNTS {
            let request = CreateUserRequest {
                first_name: "Demo".to_string(),
                last_name: account.last_name.to_string(),
                email: account.email.to_string(),
                password: account.password.to_string(),
                phone: Some("+573000000000".to_string()),
                city: Some("Bogota".to_string()),
                role: Some(account.role),
                active: Some(true),
            };
            assert!(request.validate().is_ok(), "{}", account.email);
        }
    }

    #[test]
    fn one_regular_user_and_one_super_admin() {
        let roles: Vec<Role> = DEMO_ACCOUNTS.iter().map(|a| a.role).collect();
        assert_eq!(roles, vec![Role::User, Role::SuperAdmin]);
    }
}
