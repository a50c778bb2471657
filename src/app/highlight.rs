use std::collections::HashSet;
use std::sync::Arc;

use crate::dataset::{ClusterId, Dataset};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum Selection {
    #[default]
    Nothing,
    Cluster(ClusterId),
    Job(usize),
}

impl Selection {
    pub(in crate::app) fn cluster(self, dataset: &Dataset) -> Option<ClusterId> {
        match self {
            Self::Nothing => None,
            Self::Cluster(id) => Some(id),
            Self::Job(index) => dataset.jobs.get(index).map(|job| job.cluster),
        }
    }

    pub(in crate::app) fn job(self) -> Option<usize> {
        match self {
            Self::Job(index) => Some(index),
            _ => None,
        }
    }
}

/// Discrete intents the scene hands back to the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum SelectionEvent {
    JobSelected(usize),
    ClusterSelected(ClusterId),
    SelectionCleared,
}

impl SelectionEvent {
    pub(in crate::app) fn selection(self) -> Selection {
        match self {
            Self::JobSelected(index) => Selection::Job(index),
            Self::ClusterSelected(id) => Selection::Cluster(id),
            Self::SelectionCleared => Selection::Nothing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Emphasis {
    Selected,
    Hovered,
    Matched,
    Related,
    Dimmed,
    Normal,
}

pub(in crate::app) struct HighlightState {
    selection: Selection,
    focus_cluster: Option<ClusterId>,
    hovered: Option<usize>,
    matches: Option<Arc<HashSet<usize>>>,
}

impl HighlightState {
    pub(in crate::app) fn new(
        selection: Selection,
        dataset: &Dataset,
        hovered: Option<usize>,
        matches: Option<Arc<HashSet<usize>>>,
    ) -> Self {
        Self {
            selection,
            focus_cluster: selection.cluster(dataset),
            hovered,
            matches: matches.filter(|matches| !matches.is_empty()),
        }
    }

    pub(in crate::app) fn job_emphasis(&self, index: usize, cluster: ClusterId) -> Emphasis {
        if self.selection.job() == Some(index) {
            return Emphasis::Selected;
        }
        if self.hovered == Some(index) {
            return Emphasis::Hovered;
        }
        if self
            .matches
            .as_ref()
            .is_some_and(|matches| matches.contains(&index))
        {
            return Emphasis::Matched;
        }

        match self.focus_cluster {
            Some(focus) if focus == cluster => Emphasis::Related,
            Some(_) => Emphasis::Dimmed,
            None if self.matches.is_some() => Emphasis::Dimmed,
            None => Emphasis::Normal,
        }
    }

    pub(in crate::app) fn cluster_emphasis(&self, id: ClusterId) -> Emphasis {
        if self.selection == Selection::Cluster(id) {
            return Emphasis::Selected;
        }

        match self.focus_cluster {
            Some(focus) if focus == id => Emphasis::Related,
            Some(_) => Emphasis::Dimmed,
            None => Emphasis::Normal,
        }
    }
}
