use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracelane_protocol::SharedStr;

use super::{FilteredTrace, Lane, LoadOptions, TimeRange, Trace, TraceFile, TraceFileError, lane_color};
use crate::progress::Progress;

/// Detail prefix that renames the lane it appears in.
const THREAD_NAME_PREFIX: &str = "THREAD_NAME=";

/// One loaded trace file and the lanes grouped from it.
///
/// A reload builds a fresh `LoadedTrace`; lanes of an older one keep their
/// own file alive until they are dropped.
pub struct LoadedTrace {
    file: Arc<TraceFile>,
    lanes: Vec<Lane>,
}

impl LoadedTrace {
    /// Open `path`, index it and group its events into lanes.
    pub fn load(
        path: impl AsRef<Path>,
        options: &LoadOptions,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<Self, TraceFileError> {
        let file = TraceFile::open(
            path,
            options,
            progress.as_deref_mut().map(|p| p as &mut dyn Progress),
        )?;
        Ok(Self::from_trace_file(file, progress))
    }

    /// Group the events of an already indexed file into lanes.
    pub fn from_trace_file(file: TraceFile, progress: Option<&mut dyn Progress>) -> Self {
        let file = Arc::new(file);
        let lanes = build_lanes(&file, progress);
        Self { file, lanes }
    }

    pub fn file(&self) -> &Arc<TraceFile> {
        &self.file
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn into_lanes(self) -> Vec<Lane> {
        self.lanes
    }

    pub fn lane_by_key(&self, key: &str) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.key == key)
    }

    /// Union of the first/last event times of every non-empty lane.
    pub fn time_bounds(&self) -> Option<TimeRange<f64>> {
        lanes_time_bounds(&self.lanes)
    }

    /// Append a lane holding every event of the file whose detail text
    /// matches `pattern`. An invalid pattern yields an empty lane.
    pub fn add_filter_lane(&mut self, pattern: &str, progress: Option<&mut dyn Progress>) -> &Lane {
        let parent: Arc<dyn Trace> = self.file.clone();
        let filtered = FilteredTrace::with_regex(parent, pattern, progress);
        let mut lane = Lane::new(pattern, lane_color(self.lanes.len()), Arc::new(filtered));
        lane.rename(format!("/{pattern}/"));
        self.lanes.push(lane);
        &self.lanes[self.lanes.len() - 1]
    }
}

/// Union of the first/last event times of every non-empty lane.
pub fn lanes_time_bounds(lanes: &[Lane]) -> Option<TimeRange<f64>> {
    lanes
        .iter()
        .filter_map(|lane| lane.trace.time_bounds())
        .reduce(|acc, bounds| acc.union(&bounds))
}

/// One pass over `file`, grouping each event by the first token of its
/// detail text. Lanes appear in order of first occurrence. A detail of the
/// form `KEY THREAD_NAME=<name>` renames lane `KEY` (the last such line wins)
/// and still counts as an event of that lane. Events without detail text
/// belong to no lane.
pub fn build_lanes(file: &Arc<TraceFile>, mut progress: Option<&mut dyn Progress>) -> Vec<Lane> {
    let parent: Arc<dyn Trace> = file.clone();
    let count = file.num_events();

    if let Some(p) = progress.as_deref_mut() {
        p.reset();
        p.set_range(0, count as u64);
    }

    let mut slots: HashMap<SharedStr, usize> = HashMap::new();
    let mut groups: Vec<(SharedStr, FilteredTrace)> = Vec::new();
    let mut names: HashMap<SharedStr, SharedStr> = HashMap::new();

    for idx in 0..count {
        if let Some(text) = file.event_text(idx, false)
            && let Some((key, rest)) = split_key(&text)
        {
            let slot = match slots.get(key) {
                Some(&slot) => slot,
                None => {
                    let key = SharedStr::from(key);
                    slots.insert(key.clone(), groups.len());
                    groups.push((key, FilteredTrace::new(Arc::clone(&parent))));
                    groups.len() - 1
                }
            };
            if let Some(name) = thread_name(rest) {
                names.insert(groups[slot].0.clone(), SharedStr::from(name));
            }
            groups[slot].1.add_event(idx);
        }
        if let Some(p) = progress.as_deref_mut() {
            p.set_value(idx as u64);
        }
    }

    let lanes: Vec<Lane> = groups
        .into_iter()
        .enumerate()
        .map(|(i, (key, trace))| {
            let mut lane = Lane::new(key, lane_color(i), Arc::new(trace));
            if let Some(name) = names.get(&lane.key) {
                lane.rename(name.clone());
            }
            lane
        })
        .collect();

    log::debug!("grouped {count} events into {} lanes", lanes.len());
    lanes
}

/// Split a detail text into its first whitespace-delimited token and the rest.
fn split_key(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], &text[end..]),
        None => (text, ""),
    })
}

fn thread_name(rest: &str) -> Option<&str> {
    rest.trim_start()
        .strip_prefix(THREAD_NAME_PREFIX)?
        .split_whitespace()
        .next()
}
