use lazy_static::lazy_static;
use regex::Regex;

use crate::config::FieldIds;
use crate::directory::UserProfile;

lazy_static! {
    static ref MENTION: Regex = Regex::new(r"<@(?P<user_id>[A-Z0-9]+)(?:\|[^>]*)?>")
        .expect("mention pattern is valid");
    static ref FLOOR_NUMBER: Regex =
        Regex::new(r"^\s*(?P<number>\d+)").expect("floor pattern is valid");
    static ref DESK_CODE: Regex =
        Regex::new(r"^[A-Za-z]+[0-9]+$").expect("desk pattern is valid");
}

/// Pulls the user id out of the first `<@U123|name>` mention in the command text.
pub fn extract_mentioned_user_id(text: &str) -> Option<String> {
    MENTION
        .captures(text)?
        .name("user_id")
        .map(|id| id.as_str().to_string())
}

/// Profile attributes worth reporting. `None` means the user never filled it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFields {
    pub title: Option<String>,
    pub join_date: Option<String>,
    pub org_name: Option<String>,
    pub office_location: Option<String>,
    pub office_floor: Option<String>,
    /// Leading digits of `office_floor`, e.g. 4 for "4th floor".
    pub office_floor_number: Option<u32>,
    /// Only set for codes shaped like `A12`.
    pub office_desk: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Title,
    JoinDate,
    Organisation,
    OfficeLocation,
    OfficeFloor,
    OfficeDesk,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::Title,
        ProfileField::JoinDate,
        ProfileField::Organisation,
        ProfileField::OfficeLocation,
        ProfileField::OfficeFloor,
        ProfileField::OfficeDesk,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Title => "Title",
            ProfileField::JoinDate => "Join date",
            ProfileField::Organisation => "Organisation",
            ProfileField::OfficeLocation => "Office location",
            ProfileField::OfficeFloor => "Office floor",
            ProfileField::OfficeDesk => "Desk",
        }
    }
}

impl CustomFields {
    pub fn is_set(&self, field: ProfileField) -> bool {
        match field {
            ProfileField::Title => self.title.is_some(),
            ProfileField::JoinDate => self.join_date.is_some(),
            ProfileField::Organisation => self.org_name.is_some(),
            ProfileField::OfficeLocation => self.office_location.is_some(),
            ProfileField::OfficeFloor => self.office_floor.is_some(),
            ProfileField::OfficeDesk => self.office_desk.is_some(),
        }
    }
}

pub fn extract_custom_fields(profile: &UserProfile, ids: &FieldIds) -> CustomFields {
    let lookup = |id: &str| profile.field(id).map(str::to_string);

    let title = Some(profile.title.trim())
        .filter(|title| !title.is_empty())
        .map(str::to_string);

    let office_floor = lookup(ids.office_floor.as_str());
    let office_floor_number = office_floor.as_deref().and_then(floor_number);

    let office_desk = ids
        .office_desk
        .as_deref()
        .and_then(lookup)
        .filter(|desk| DESK_CODE.is_match(desk));

    CustomFields {
        title,
        join_date: lookup(ids.join_date.as_str()),
        org_name: lookup(ids.organisation.as_str()),
        office_location: lookup(ids.office_location.as_str()),
        office_floor,
        office_floor_number,
        office_desk,
    }
}

fn floor_number(value: &str) -> Option<u32> {
    FLOOR_NUMBER
        .captures(value)?
        .name("number")?
        .as_str()
        .parse()
        .ok()
}

/// Whether the workspace has a profile field to hold this attribute at all.
fn is_tracked(field: ProfileField, ids: &FieldIds) -> bool {
    match field {
        ProfileField::OfficeDesk => ids.office_desk.is_some(),
        _ => true,
    }
}

/// Fields still to fill in, in display order. Empty means the profile is complete.
pub fn list_missing_fields(fields: &CustomFields, ids: &FieldIds) -> Vec<ProfileField> {
    ProfileField::ALL
        .into_iter()
        .filter(|field| is_tracked(*field, ids) && !fields.is_set(*field))
        .collect()
}

pub fn labels(missing: &[ProfileField]) -> Vec<String> {
    missing.iter().map(|field| field.label().to_string()).collect()
}
