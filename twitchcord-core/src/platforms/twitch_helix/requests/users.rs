use crate::Error;
use crate::models::UserProfile;
use crate::platforms::twitch_helix::client::TwitchHelixClient;

pub enum UserLookup<'a> {
    Id(&'a str),
    Login(&'a str),
}

/// "Get Users" for a single id or login.
pub async fn fetch_user(
    client: &TwitchHelixClient,
    lookup: UserLookup<'_>,
) -> Result<Option<UserProfile>, Error> {
    let query = match lookup {
        UserLookup::Id(id) => ("id", id.to_string()),
        UserLookup::Login(login) => ("login", login.to_lowercase()),
    };
    let resp = client.get_helix::<UserProfile>("users", &[query]).await?;
    Ok(resp.data.into_iter().next())
}
