use chrono::NaiveDate;

use crate::blocks::{escape_mrkdwn, Block, ButtonElement, ButtonStyle};
use crate::config::FloorPlan;
use crate::directory::UserProfile;
use crate::fields::{CustomFields, ProfileField};

pub fn add_ordinal_suffix(n: u32) -> String {
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// `a`, `a and b`, `a, b, and c`.
pub fn join_clauses<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|item| item.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

fn join_date_clause(value: &str) -> String {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => format!("joined in {}", date.format("%B %Y")),
        Err(_) => format!("joined on {}", escape_mrkdwn(value)),
    }
}

fn floor_clause(fields: &CustomFields) -> Option<String> {
    match (fields.office_floor_number, fields.office_floor.as_deref()) {
        (Some(number), _) => Some(format!("sits on the {} floor", add_ordinal_suffix(number))),
        (None, Some(raw)) => Some(format!("sits on the {}", escape_mrkdwn(raw))),
        (None, None) => None,
    }
}

/// Profile values are escaped, so the result is safe to use as `mrkdwn`.
pub fn build_reply_sentence(profile: &UserProfile, fields: &CustomFields) -> String {
    let name = escape_mrkdwn(profile.name());

    let clauses: Vec<String> = [
        fields.join_date.as_deref().map(join_date_clause),
        fields
            .title
            .as_deref()
            .map(|title| format!("works as {}", escape_mrkdwn(title))),
        fields
            .org_name
            .as_deref()
            .map(|org| format!("is part of {}", escape_mrkdwn(org))),
        fields
            .office_location
            .as_deref()
            .map(|location| format!("works from the {} office", escape_mrkdwn(location))),
        floor_clause(fields),
    ]
    .into_iter()
    .flatten()
    .collect();

    if clauses.is_empty() {
        return format!(
            "Hi! I asked around about {}, but nobody could tell me anything yet.",
            name
        );
    }

    format!(
        "Hi! I asked around about {} and found out that {} {}.",
        name,
        name,
        join_clauses(&clauses)
    )
}

/// Deep link into the floor-plan sheet with the desk cell selected.
pub fn build_floor_plan_link(fields: &CustomFields, plan: &FloorPlan) -> Option<String> {
    let floor = fields.office_floor_number?;
    let desk = fields.office_desk.as_deref()?;

    let gid = match floor {
        4 => Some(&plan.fourth_floor_gid),
        5 => Some(&plan.fifth_floor_gid),
        _ => None,
    };

    Some(match gid {
        Some(gid) => format!("{}#gid={}&range={}", plan.url, gid, desk),
        None => format!("{}#range={}", plan.url, desk),
    })
}

/// Extra lines appended under the main answer when someone was nudged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    /// The looked-up user has gaps. `reminder_sent` is false on dry runs,
    /// where the nudge is only logged.
    RequesteeNudged {
        missing: Vec<ProfileField>,
        reminder_sent: bool,
    },
    /// The person asking has gaps of their own.
    RequesterIncomplete {
        missing: Vec<ProfileField>,
        profile_edit_url: String,
    },
}

fn label_list(missing: &[ProfileField]) -> String {
    let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
    join_clauses(&labels)
}

pub fn build_reply_blocks(
    profile: &UserProfile,
    fields: &CustomFields,
    floor_plan_link: Option<&str>,
    followups: &[Followup],
) -> Vec<Block> {
    let name = escape_mrkdwn(profile.name());
    let sentence = build_reply_sentence(profile, fields);

    let mut blocks = vec![match profile.avatar_url.as_deref() {
        Some(avatar) => Block::section_with_image(sentence, avatar, profile.name()),
        None => Block::section(sentence),
    }];

    if let (Some(link), Some(desk)) = (floor_plan_link, fields.office_desk.as_deref()) {
        blocks.push(Block::section(format!(
            ":round_pushpin: <{}|Find {} at desk {} on the floor plan>",
            link, name, desk
        )));
    }

    if !followups.is_empty() {
        blocks.push(Block::Divider);
    }

    for followup in followups {
        match followup {
            Followup::RequesteeNudged {
                missing,
                reminder_sent,
            } => {
                let tail = if *reminder_sent {
                    ", so I've sent them a reminder"
                } else {
                    ""
                };
                blocks.push(Block::context(format!(
                    "{}'s profile is missing {}{}.",
                    name,
                    label_list(missing),
                    tail
                )));
            }
            Followup::RequesterIncomplete {
                missing,
                profile_edit_url,
            } => {
                blocks.push(Block::section(format!(
                    "By the way, your own profile is missing {}. Fill it in so others can find you too!",
                    label_list(missing)
                )));
                blocks.push(Block::actions(vec![ButtonElement::link(
                    "complete_profile",
                    "Complete my profile",
                    profile_edit_url.clone(),
                )
                .style(ButtonStyle::Primary)]));
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::TextObject;

    fn ada() -> UserProfile {
        UserProfile {
            id: "U123".to_string(),
            display_name: "Ada".to_string(),
            ..Default::default()
        }
    }

    fn full_fields() -> CustomFields {
        CustomFields {
            title: Some("Engineer".to_string()),
            join_date: Some("2017-03-01".to_string()),
            org_name: Some("Platform".to_string()),
            office_location: Some("Amsterdam".to_string()),
            office_floor: Some("4th floor".to_string()),
            office_floor_number: Some(4),
            office_desk: Some("A12".to_string()),
        }
    }

    fn plan() -> FloorPlan {
        FloorPlan::new("https://docs.google.com/spreadsheets/d/sheet/edit")
    }

    fn section_text(block: &Block) -> &str {
        match block {
            Block::Section {
                text: TextObject::Mrkdwn { text },
                ..
            } => text,
            other => panic!("expected mrkdwn section, got {other:?}"),
        }
    }

    #[test]
    fn ordinal_boundaries() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (23, "23rd"),
            (101, "101st"),
            (111, "111th"),
            (0, "0th"),
        ];
        for (n, expected) in cases {
            assert_eq!(add_ordinal_suffix(n), expected);
        }
    }

    #[test]
    fn clauses_join_with_final_and() {
        assert_eq!(join_clauses::<&str>(&[]), "");
        assert_eq!(join_clauses(&["a"]), "a");
        assert_eq!(join_clauses(&["a", "b"]), "a and b");
        assert_eq!(join_clauses(&["a", "b", "c"]), "a, b, and c");
    }

    #[test]
    fn sentence_lists_clauses_in_fixed_order() {
        assert_eq!(
            build_reply_sentence(&ada(), &full_fields()),
            "Hi! I asked around about Ada and found out that Ada joined in March 2017, \
             works as Engineer, is part of Platform, works from the Amsterdam office, \
             and sits on the 4th floor."
        );
    }

    #[test]
    fn sentence_skips_empty_fields() {
        let fields = CustomFields {
            title: Some("Designer".to_string()),
            office_floor: Some("12".to_string()),
            office_floor_number: Some(12),
            ..Default::default()
        };

        assert_eq!(
            build_reply_sentence(&ada(), &fields),
            "Hi! I asked around about Ada and found out that Ada works as Designer and sits on the 12th floor."
        );
    }

    #[test]
    fn unparsed_join_date_and_floor_are_used_verbatim() {
        let fields = CustomFields {
            join_date: Some("last spring".to_string()),
            office_floor: Some("Ground floor".to_string()),
            ..Default::default()
        };

        assert_eq!(
            build_reply_sentence(&ada(), &fields),
            "Hi! I asked around about Ada and found out that Ada joined on last spring and sits on the Ground floor."
        );
    }

    #[test]
    fn sentence_with_nothing_known() {
        assert_eq!(
            build_reply_sentence(&ada(), &CustomFields::default()),
            "Hi! I asked around about Ada, but nobody could tell me anything yet."
        );
    }

    #[test]
    fn fourth_floor_link_uses_its_sheet() {
        assert_eq!(
            build_floor_plan_link(&full_fields(), &plan()).as_deref(),
            Some("https://docs.google.com/spreadsheets/d/sheet/edit#gid=924686718&range=A12")
        );
    }

    #[test]
    fn fifth_floor_link_uses_its_sheet() {
        let fields = CustomFields {
            office_floor_number: Some(5),
            ..full_fields()
        };

        assert_eq!(
            build_floor_plan_link(&fields, &plan()).as_deref(),
            Some("https://docs.google.com/spreadsheets/d/sheet/edit#gid=0&range=A12")
        );
    }

    #[test]
    fn other_floors_get_bare_link() {
        let fields = CustomFields {
            office_floor_number: Some(2),
            ..full_fields()
        };

        assert_eq!(
            build_floor_plan_link(&fields, &plan()).as_deref(),
            Some("https://docs.google.com/spreadsheets/d/sheet/edit#range=A12")
        );
    }

    #[test]
    fn link_needs_floor_and_desk() {
        let no_desk = CustomFields {
            office_desk: None,
            ..full_fields()
        };
        let no_floor = CustomFields {
            office_floor_number: None,
            ..full_fields()
        };

        assert_eq!(build_floor_plan_link(&no_desk, &plan()), None);
        assert_eq!(build_floor_plan_link(&no_floor, &plan()), None);
    }

    #[test]
    fn blocks_carry_avatar_and_floor_plan() {
        let profile = UserProfile {
            avatar_url: Some("https://avatars/ada.png".to_string()),
            ..ada()
        };
        let blocks = build_reply_blocks(
            &profile,
            &full_fields(),
            Some("https://sheet#gid=924686718&range=A12"),
            &[],
        );

        assert_eq!(blocks.len(), 2);
        assert!(matches!(
            &blocks[0],
            Block::Section { accessory: Some(_), .. }
        ));
        assert_eq!(
            section_text(&blocks[1]),
            ":round_pushpin: <https://sheet#gid=924686718&range=A12|Find Ada at desk A12 on the floor plan>"
        );
    }

    #[test]
    fn blocks_without_avatar_or_link() {
        let blocks = build_reply_blocks(&ada(), &full_fields(), None, &[]);

        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::Section { accessory: None, .. }));
    }

    #[test]
    fn followups_add_context_and_button() {
        let followups = [
            Followup::RequesteeNudged {
                missing: vec![ProfileField::OfficeDesk],
                reminder_sent: true,
            },
            Followup::RequesterIncomplete {
                missing: vec![ProfileField::JoinDate, ProfileField::Title],
                profile_edit_url: "https://slack.com/account/profile".to_string(),
            },
        ];
        let blocks = build_reply_blocks(&ada(), &CustomFields::default(), None, &followups);

        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[1], Block::Divider);
        assert_eq!(
            blocks[2],
            Block::context("Ada's profile is missing Desk, so I've sent them a reminder.")
        );
        assert_eq!(
            section_text(&blocks[3]),
            "By the way, your own profile is missing Join date and Title. Fill it in so others can find you too!"
        );
        match &blocks[4] {
            Block::Actions { elements } => {
                assert_eq!(elements.len(), 1);
                assert_eq!(elements[0].url, "https://slack.com/account/profile");
            }
            other => panic!("expected actions block, got {other:?}"),
        }
    }

    #[test]
    fn profile_values_cannot_inject_markup() {
        let profile = UserProfile {
            display_name: "<!channel>".to_string(),
            ..ada()
        };
        let fields = CustomFields {
            title: Some("<!here>".to_string()),
            org_name: Some("R&D".to_string()),
            office_location: Some("<https://evil.example|HQ>".to_string()),
            ..Default::default()
        };

        assert_eq!(
            build_reply_sentence(&profile, &fields),
            "Hi! I asked around about &lt;!channel&gt; and found out that &lt;!channel&gt; \
             works as &lt;!here&gt;, is part of R&amp;D, \
             and works from the &lt;https://evil.example|HQ&gt; office."
        );
    }

    #[test]
    fn dry_run_context_does_not_claim_a_reminder() {
        let followups = [Followup::RequesteeNudged {
            missing: vec![ProfileField::Title, ProfileField::OfficeFloor],
            reminder_sent: false,
        }];
        let blocks = build_reply_blocks(&ada(), &CustomFields::default(), None, &followups);

        assert_eq!(
            blocks[2],
            Block::context("Ada's profile is missing Title and Office floor.")
        );
    }
}
