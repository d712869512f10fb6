use crate::user_repo::UserRepoError::{EmailTaken, UsernameTaken};
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    users: HashMap<UserId, User>,
    next_id: UserId,
}

pub struct MemUserRepo {
    state: RwLock<State>,
}

impl MemUserRepo {
    pub fn new() -> MemUserRepo {
        let state = State {
            users: HashMap::new(),
            next_id: 1,
        };
        MemUserRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemUserRepo {
    fn default() -> Self {
        MemUserRepo::new()
    }
}

#[async_trait]
impl UserRepo for MemUserRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, UserRepoError> {
        let mut write_guard = self.write_lock()?;

        // check and insert under the same guard, mirroring the table's unique constraints
        if write_guard.users.values().any(|u| u.email == user.email) {
            return Err(EmailTaken(user.email));
        }
        if write_guard.users.values().any(|u| u.username == user.username) {
            return Err(UsernameTaken(user.username));
        }

        let id = write_guard.next_id;
        write_guard.next_id += 1;

        let now = Utc::now();
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        write_guard.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<User>, UserRepoError> {
        let read_guard = self.read_lock()?;
        Ok(read_guard.users.get(&user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserRepoError> {
        let read_guard = self.read_lock()?;
        Ok(read_guard
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}
