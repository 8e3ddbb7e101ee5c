//! Item models carried by the social lists (people and clubs).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_following: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClubModel {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_member: bool,
}

/// Item-level change announced on the cross-list event bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    FollowingStateChanged { user_id: String, state: bool },
    ClubJoinedStateChanged { club_id: String, state: bool },
}

/// Produces a patched copy of an item when an event concerns it.
pub trait EventPatch<E>: Sized {
    fn patched(&self, event: &E) -> Option<Self>;
}

impl EventPatch<AppEvent> for UserModel {
    fn patched(&self, event: &AppEvent) -> Option<Self> {
        match event {
            AppEvent::FollowingStateChanged { user_id, state } if *user_id == self.id => {
                Some(UserModel {
                    is_following: *state,
                    ..self.clone()
                })
            }
            _ => None,
        }
    }
}

impl EventPatch<AppEvent> for ClubModel {
    fn patched(&self, event: &AppEvent) -> Option<Self> {
        match event {
            AppEvent::ClubJoinedStateChanged { club_id, state } if *club_id == self.id => {
                Some(ClubModel {
                    is_member: *state,
                    ..self.clone()
                })
            }
            _ => None,
        }
    }
}
