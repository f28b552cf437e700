/// Where results and errors for a job are delivered.
///
/// Exactly one platform id is the effective reply target; for group and room
/// sources `user_id` additionally identifies the speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    User {
        user_id: String,
    },
    Group {
        group_id: String,
        user_id: Option<String>,
    },
    Room {
        room_id: String,
        user_id: Option<String>,
    },
}

impl Destination {
    /// The single platform id replies are pushed to.
    pub fn reply_target(&self) -> &str {
        match self {
            Destination::User { user_id } => user_id,
            Destination::Group { group_id, .. } => group_id,
            Destination::Room { room_id, .. } => room_id,
        }
    }

    /// The user who sent the voice message, when the platform told us.
    pub fn speaker_user_id(&self) -> Option<&str> {
        match self {
            Destination::User { user_id } => Some(user_id),
            Destination::Group { user_id, .. } | Destination::Room { user_id, .. } => {
                user_id.as_deref()
            }
        }
    }

    /// Reassemble from the three nullable store columns.
    pub fn from_columns(
        user_id: Option<String>,
        group_id: Option<String>,
        room_id: Option<String>,
    ) -> Result<Self, String> {
        match (group_id, room_id, user_id) {
            (Some(group_id), _, user_id) => Ok(Destination::Group { group_id, user_id }),
            (None, Some(room_id), user_id) => Ok(Destination::Room { room_id, user_id }),
            (None, None, Some(user_id)) => Ok(Destination::User { user_id }),
            (None, None, None) => Err("job has no destination id".to_string()),
        }
    }

    /// The three nullable store columns, in (user, group, room) order.
    pub fn as_columns(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        match self {
            Destination::User { user_id } => (Some(user_id), None, None),
            Destination::Group { group_id, user_id } => (user_id.as_deref(), Some(group_id), None),
            Destination::Room { room_id, user_id } => (user_id.as_deref(), None, Some(room_id)),
        }
    }
}
