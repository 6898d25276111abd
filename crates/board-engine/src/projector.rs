use crate::BoardState;

use board_core::{Column, Priority, Task};

use std::sync::Arc;

/// Three-mode membership filter shared by the backlog and sprint axes:
/// any link at all, no link, or a specific id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkFilter {
    /// Filter inactive
    #[default]
    Unset,
    /// At least one link ("all")
    Linked,
    /// Zero links ("none")
    Unlinked,
    /// Linked to this specific id
    To(i64),
}

impl LinkFilter {
    fn admits(&self, has_any: bool, contains: impl Fn(i64) -> bool) -> bool {
        match self {
            Self::Unset => true,
            Self::Linked => has_any,
            Self::Unlinked => !has_any,
            Self::To(id) => contains(*id),
        }
    }
}

/// Active filter criteria. All axes are conjunctive.
///
/// The user axis matches assignee emails exactly (case-sensitive;
/// normalization happens upstream). The priority axis is already
/// normalized by [`Priority`]'s case-insensitive parse.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardFilter {
    pub backlog: LinkFilter,
    pub sprint: LinkFilter,
    pub user: Option<String>,
    pub priority: Option<Priority>,
}

impl BoardFilter {
    pub fn admits(&self, task: &Task) -> bool {
        if !self
            .backlog
            .admits(task.has_backlog_link(), |id| task.is_linked_to_backlog(id))
        {
            return false;
        }

        if !self
            .sprint
            .admits(task.sprint_id.is_some(), |id| task.is_in_sprint(id))
        {
            return false;
        }

        if let Some(ref user) = self.user
            && !task.assigned_user_emails.contains(user)
        {
            return false;
        }

        if let Some(priority) = self.priority
            && task.priority != priority
        {
            return false;
        }

        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumnView {
    pub column_id: i64,
    pub name: String,
    pub tasks: Vec<Task>,
}

/// The per-column task lists a board render consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardView {
    pub columns: Vec<BoardColumnView>,
}

impl BoardView {
    pub fn column(&self, name: &str) -> Option<&BoardColumnView> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

/// Pure projection: column name -> ordered tasks that belong to that
/// column and satisfy every active filter. Tasks whose status matches no
/// known column are silently dropped.
pub fn project_board(columns: &[&Column], tasks: &[&Task], filter: &BoardFilter) -> BoardView {
    let mut ordered: Vec<&Column> = columns.to_vec();
    ordered.sort_by_key(|c| (c.display_order, c.id));

    let column_views = ordered
        .into_iter()
        .map(|column| {
            let mut members: Vec<&Task> = tasks
                .iter()
                .copied()
                .filter(|t| t.status == column.name && filter.admits(t))
                .collect();
            members.sort_by_key(|t| (t.display_order, t.id));

            BoardColumnView {
                column_id: column.id,
                name: column.name.clone(),
                tasks: members.into_iter().cloned().collect(),
            }
        })
        .collect();

    BoardView {
        columns: column_views,
    }
}

/// Memoizing wrapper keyed on the state revision and the filter, so an
/// unchanged board yields the same `Arc` and renders can skip work.
#[derive(Debug, Default)]
pub struct BoardProjector {
    cached: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    revision: u64,
    filter: BoardFilter,
    view: Arc<BoardView>,
}

impl BoardProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&mut self, state: &BoardState, filter: &BoardFilter) -> Arc<BoardView> {
        if let Some(entry) = &self.cached
            && entry.revision == state.revision()
            && entry.filter == *filter
        {
            return Arc::clone(&entry.view);
        }

        let columns = state.columns_ordered();
        let tasks: Vec<&Task> = state.tasks().collect();
        let view = Arc::new(project_board(&columns, &tasks, filter));

        self.cached = Some(CacheEntry {
            revision: state.revision(),
            filter: filter.clone(),
            view: Arc::clone(&view),
        });

        view
    }
}
