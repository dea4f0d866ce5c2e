//! Pre-order, depth-first enumeration of a remote folder tree

use crate::{
    drive::{Fields, ListFiles, ListQuery},
    error::Result,
    output::Printer,
};
use async_recursion::async_recursion;
use std::{collections::HashSet, io::Write};

/// Whether continuation tokens are followed when listing a folder
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Pagination {
    /// Only the first page of each folder is visited, larger folders are
    /// silently under-enumerated
    #[default]
    FirstPage,
    All,
}

/// Counts of the entries printed during a walk
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub folders: usize,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Walker {
    pub pagination: Pagination,
    /// Folders at this depth are printed but not descended into, the
    /// children of the root being at depth 0
    pub max_depth: Option<usize>,
    pub printer: Printer,
}

struct State {
    visited: HashSet<String>,
    summary: Summary,
}

impl Walker {
    pub fn new(printer: Printer) -> Self {
        Self {
            printer,
            ..Default::default()
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Prints every entry transitively contained in `folder_id` as it is
    /// discovered, each folder immediately followed by its own contents.
    ///
    /// The first listing failure aborts the walk, lines printed before it
    /// are left as is.
    ///
    /// Each folder is descended into at most once, so a hierarchy where a
    /// folder is its own descendant still terminates.
    pub async fn walk<L, W>(&self, lister: &L, folder_id: &str, out: &mut W) -> Result<Summary>
    where
        L: ListFiles,
        W: Write,
    {
        let mut state = State {
            visited: HashSet::from([folder_id.to_owned()]),
            summary: Summary::default(),
        };

        self.visit(lister, folder_id, 0, out, &mut state).await?;
        Ok(state.summary)
    }

    #[async_recursion(?Send)]
    async fn visit<L, W>(
        &self,
        lister: &L,
        folder_id: &str,
        depth: usize,
        out: &mut W,
        state: &mut State,
    ) -> Result<()>
    where
        L: ListFiles,
        W: Write,
    {
        let mut page_token: Option<String> = None;

        loop {
            let query = ListQuery::children(folder_id)
                .with_fields(Fields::Basic)
                .with_page_token(page_token.as_deref());
            let page = lister.list(&query).await?;

            for file in &page.files {
                self.printer.walk_entry(out, file, depth)?;

                if !file.is_folder() {
                    state.summary.files += 1;
                    continue;
                }

                state.summary.folders += 1;

                if self.max_depth.map_or(false, |max| depth >= max) {
                    tracing::debug!(folder = %file.id, depth, "max depth reached");
                    continue;
                }

                if !state.visited.insert(file.id.clone()) {
                    tracing::warn!(folder = %file.id, name = %file.name, "folder already visited, skipping");
                    continue;
                }

                self.visit(lister, &file.id, depth + 1, out, state).await?;
            }

            match (page.next_page_token, self.pagination) {
                (Some(next), Pagination::All) => page_token = Some(next),
                (Some(next), Pagination::FirstPage) => {
                    tracing::debug!(folder = folder_id, page_token = %next, "more children available, not following");
                    break;
                }
                (None, _) => break,
            }
        }

        Ok(())
    }
}
