//! Lane packing for overlapping spans.
//!
//! # Algorithm
//!
//! Greedy interval-graph coloring:
//! 1. Stable-sort spans by start offset (ties keep caller order).
//! 2. For each span, scan lanes from index 0 and take the first lane whose
//!    placed intervals do not intersect `[start, start + width)`.
//! 3. Open a new lane when none fits.
//!
//! Not lane-count optimal in general, but deterministic and stable under
//! small perturbations of the input.
//!
//! # Complexity
//! O(n · L) lane probes where L = lanes opened (each probe scans that
//! lane's intervals).
//!
//! # Reference
//! Golumbic (2004), "Algorithmic Graph Theory and Perfect Graphs", Ch. 8

use serde::{Deserialize, Serialize};

/// A time span to pack, measured in (fractional) columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Caller's identifier.
    pub id: String,
    /// Start offset (columns).
    pub start: f64,
    /// Width (columns).
    pub width: f64,
}

impl Span {
    /// Creates a span.
    pub fn new(id: impl Into<String>, start: f64, width: f64) -> Self {
        Self {
            id: id.into(),
            start,
            width,
        }
    }

    /// Exclusive end offset.
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.width
    }
}

/// A span with its assigned lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSpan {
    /// The input span.
    pub span: Span,
    /// 0-based lane index.
    pub lane: usize,
}

/// Result of packing one person's spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Packing {
    /// Placed spans, in caller order.
    pub placed: Vec<PlacedSpan>,
    /// `max(1, lanes opened)`.
    pub lane_count: usize,
}

impl Packing {
    /// Lane assigned to a span ID.
    pub fn lane_of(&self, id: &str) -> Option<usize> {
        self.placed
            .iter()
            .find(|p| p.span.id == id)
            .map(|p| p.lane)
    }
}

/// Packs spans into non-overlapping lanes.
///
/// # Example
/// ```
/// use u_plangrid::layout::lanes::{pack, Span};
///
/// let packing = pack(&[
///     Span::new("A", 0.0, 2.0),
///     Span::new("B", 1.0, 2.0),
///     Span::new("C", 3.0, 1.0),
/// ]);
/// assert_eq!(packing.lane_of("A"), Some(0));
/// assert_eq!(packing.lane_of("B"), Some(1));
/// assert_eq!(packing.lane_of("C"), Some(0));
/// assert_eq!(packing.lane_count, 2);
/// ```
pub fn pack(spans: &[Span]) -> Packing {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    // sort_by is stable: equal starts keep caller order
    order.sort_by(|&a, &b| spans[a].start.total_cmp(&spans[b].start));

    let mut lanes: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut lane_by_input = vec![0usize; spans.len()];

    for &idx in &order {
        let span = &spans[idx];
        let (start, end) = (span.start, span.end());

        let free = lanes.iter().position(|intervals| {
            intervals
                .iter()
                .all(|&(s, e)| end <= s || start >= e)
        });

        let lane = match free {
            Some(lane) => lane,
            None => {
                lanes.push(Vec::new());
                lanes.len() - 1
            }
        };
        lanes[lane].push((start, end));
        lane_by_input[idx] = lane;
    }

    let placed = spans
        .iter()
        .zip(lane_by_input)
        .map(|(span, lane)| PlacedSpan {
            span: span.clone(),
            lane,
        })
        .collect();

    Packing {
        placed,
        lane_count: lanes.len().max(1),
    }
}
