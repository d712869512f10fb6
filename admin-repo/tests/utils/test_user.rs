use admin_repo::user_repo::NewUser;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::Fake;
use uuid::Uuid;

/// A user whose username and email cannot collide with rows left behind by earlier runs.
pub fn unique_new_user() -> NewUser {
    let suffix = Uuid::new_v4().simple().to_string();
    let username: String = Username().fake();
    let email: String = SafeEmail().fake();
    NewUser::new(
        format!("{}-{}", username, suffix),
        format!("{}.{}", suffix, email),
        "not a real hash".to_owned(),
    )
}
