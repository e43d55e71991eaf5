use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{ColumnSpec, ColumnType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Menu {
    pub id: Uuid,
    pub nama: String,
    pub link: Option<String>,
    pub icon: Option<String>,
    pub keterangan: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl Menu {
    pub const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("id", ColumnType::Uuid),
        ColumnSpec::new("nama", ColumnType::Text),
        ColumnSpec::new("link", ColumnType::Text),
        ColumnSpec::new("icon", ColumnType::Text),
        ColumnSpec::new("keterangan", ColumnType::Text),
        ColumnSpec::new("is_deleted", ColumnType::Bool),
        ColumnSpec::new("created_at", ColumnType::Timestamp),
        ColumnSpec::new("updated_at", ColumnType::Timestamp),
    ];

    pub const SEARCH_COLUMNS: &'static [&'static str] = &["nama", "link", "keterangan"];
}

#[derive(Debug, Clone)]
pub struct NewMenu {
    pub nama: String,
    pub link: Option<String>,
    pub icon: Option<String>,
    pub keterangan: Option<String>,
}

/// A role's grant of one menu, positioned inside its (posisi, level, parent_id) group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MenuUser {
    pub id: Uuid,
    pub id_role: Uuid,
    pub id_menu: Uuid,
    pub urutan: i32,
    pub level: i32,
    pub parent_id: Option<Uuid>,
    pub posisi: String,
}

impl MenuUser {
    pub fn same_group(&self, other: &MenuUser) -> bool {
        self.id_role == other.id_role
            && self.posisi == other.posisi
            && self.level == other.level
            && self.parent_id == other.parent_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenuUser {
    pub id_menu: Uuid,
    pub urutan: i32,
    pub level: i32,
    pub parent_id: Option<Uuid>,
    pub posisi: String,
}

/// A grant joined with its menu, as shown to clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleMenu {
    pub id: Uuid,
    pub id_role: Uuid,
    pub id_menu: Uuid,
    pub nama: String,
    pub link: Option<String>,
    pub icon: Option<String>,
    pub urutan: i32,
    pub level: i32,
    pub parent_id: Option<Uuid>,
    pub posisi: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Up,
    Down,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(SortDirection::Up),
            "down" => Ok(SortDirection::Down),
            other => Err(format!("Arah urutan tidak dikenal: {}", other)),
        }
    }
}

/// Pick the row whose `urutan` the target swaps with.
///
/// `group` holds every row of the target's group; `Up` takes the closest smaller
/// `urutan`, `Down` the closest larger one.
pub fn neighbour<'a>(target: &MenuUser, group: &'a [MenuUser], direction: SortDirection) -> Option<&'a MenuUser> {
    let candidates = group.iter().filter(|row| row.id != target.id && row.same_group(target));
    match direction {
        SortDirection::Up => candidates.filter(|row| row.urutan < target.urutan).max_by_key(|row| row.urutan),
        SortDirection::Down => candidates.filter(|row| row.urutan > target.urutan).min_by_key(|row| row.urutan),
    }
}

/// Renumber `urutan` densely from 1 inside each group, keeping the supplied relative order.
pub fn normalize_order(mut grants: Vec<NewMenuUser>) -> Vec<NewMenuUser> {
    // stable sort keeps the request order for equal urutan values
    grants.sort_by(|a, b| {
        (a.posisi.as_str(), a.level, a.parent_id, a.urutan).cmp(&(b.posisi.as_str(), b.level, b.parent_id, b.urutan))
    });

    let mut next = 0;
    let mut previous: Option<(String, i32, Option<Uuid>)> = None;
    for grant in grants.iter_mut() {
        let key = (grant.posisi.clone(), grant.level, grant.parent_id);
        if previous.as_ref() != Some(&key) {
            next = 0;
            previous = Some(key);
        }
        next += 1;
        grant.urutan = next;
    }
    grants
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(urutan: i32, parent_id: Option<Uuid>) -> MenuUser {
        MenuUser {
            id: Uuid::new_v4(),
            id_role: Uuid::nil(),
            id_menu: Uuid::new_v4(),
            urutan,
            level: 1,
            parent_id,
            posisi: "sidebar".to_string(),
        }
    }

    #[test]
    fn neighbour_stays_inside_group() {
        let parent = Some(Uuid::new_v4());
        let group = vec![row(1, None), row(2, None), row(3, None), row(1, parent)];

        let up = neighbour(&group[1], &group, SortDirection::Up).unwrap();
        assert_eq!(up.id, group[0].id);
        let down = neighbour(&group[1], &group, SortDirection::Down).unwrap();
        assert_eq!(down.id, group[2].id);
        assert!(neighbour(&group[0], &group, SortDirection::Up).is_none());
        assert!(neighbour(&group[3], &group, SortDirection::Down).is_none());
    }

    #[test]
    fn normalize_makes_dense_sequences_per_group() {
        let grant = |posisi: &str, level, urutan| NewMenuUser {
            id_menu: Uuid::new_v4(),
            urutan,
            level,
            parent_id: None,
            posisi: posisi.to_string(),
        };
        let grants = vec![grant("sidebar", 1, 10), grant("sidebar", 1, 4), grant("top", 1, 7), grant("sidebar", 2, 0)];
        let ids: Vec<Uuid> = grants.iter().map(|g| g.id_menu).collect();

        let normalized = normalize_order(grants);
        let find = |id: Uuid| normalized.iter().find(|g| g.id_menu == id).unwrap().urutan;
        assert_eq!(find(ids[1]), 1);
        assert_eq!(find(ids[0]), 2);
        assert_eq!(find(ids[2]), 1);
        assert_eq!(find(ids[3]), 1);
    }

    #[test]
    fn parses_direction() {
        assert_eq!("UP".parse::<SortDirection>().unwrap(), SortDirection::Up);
        assert_eq!("down".parse::<SortDirection>().unwrap(), SortDirection::Down);
        assert!("left".parse::<SortDirection>().is_err());
    }
}
