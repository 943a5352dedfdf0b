//! Dash-segmented path walking.
//!
//! A walk advances a pen along a [`PathModel`] by a fixed arc-length budget per frame. Within one
//! budget the pen may cross any number of dash toggles and polyline vertices; every iteration
//! steps to the nearest of three boundaries:
//!
//! 1. the end of the current dash or gap,
//! 2. the end of the current polyline segment,
//! 3. the end of the frame's remaining budget.
//!
//! Dash phase is measured on the cumulative drawn length, so a dash that straddles a vertex is
//! emitted as one sub-segment on each side of it.
//!
//! [`advance`] is pure: it takes a [`DashState`] by value and returns the next state together
//! with everything the frame emitted. [`DashWalker`] owns a state for the driver loop.

use crate::{
    foundation::core::{Line, Point, Vec2},
    path::model::PathModel,
};

/// A walk counts as done once it is within this much arc length of the path's end.
pub const DONE_TOLERANCE: f64 = 1.0;

/// Which boundary limited a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// The current dash or gap ends; the dash phase toggles.
    Dash,
    /// The current polyline segment ends; the walk moves to the next one.
    Segment,
    /// The frame's budget is exhausted.
    Budget,
}

/// Choose the nearest boundary and the distance to it.
///
/// Dash wins ties against segment end, and both win ties against the budget. A dash-bounded step
/// that exactly reaches a vertex leaves a zero-length remainder which the next step consumes as a
/// segment advance.
pub fn nearest_boundary(to_dash: f64, to_segment_end: f64, budget_left: f64) -> (Boundary, f64) {
    let (mut boundary, mut step) = if to_dash > to_segment_end {
        (Boundary::Segment, to_segment_end)
    } else {
        (Boundary::Dash, to_dash)
    };
    if step > budget_left {
        boundary = Boundary::Budget;
        step = budget_left;
    }
    (boundary, step.max(0.0))
}

/// Cursor state of a walk. Only [`advance`] produces new states.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashState {
    /// Arc length consumed so far.
    pub drawn_len: f64,
    /// Number of completed dash/gap toggles.
    pub dash_count: u64,
    /// Whether the pen is currently inside a drawn dash.
    pub on_draw: bool,
    /// Index of the polyline segment being traversed.
    pub segment: usize,
    pub segment_len: f64,
    /// Arc length consumed within the current segment. Never exceeds `segment_len`.
    pub segment_drawn: f64,
    /// Delta vector of the current segment.
    pub delta: Vec2,
    /// Leading position of the pen after the most recent step.
    pub focus: Point,
}

impl DashState {
    /// Start of a walk: first dash drawn, segment 0, nothing consumed.
    pub fn start(path: &PathModel) -> Self {
        let mut s = Self {
            drawn_len: 0.0,
            dash_count: 0,
            on_draw: true,
            segment: 0,
            segment_len: 0.0,
            segment_drawn: 0.0,
            delta: Vec2::ZERO,
            focus: path.first_point().unwrap_or(Point::ORIGIN),
        };
        s.enter_segment(path, 0);
        s
    }

    /// True when no segment remains to be traversed.
    pub fn is_past_end(&self, path: &PathModel) -> bool {
        self.segment >= path.segment_count()
    }

    fn enter_segment(&mut self, path: &PathModel, idx: usize) {
        self.segment = idx;
        if let Some(line) = path.segment(idx) {
            self.segment_drawn = 0.0;
            self.delta = line.p1 - line.p0;
            self.segment_len = line.length();
        }
    }

    fn distance_to_dash_toggle(&self, dash_len: f64) -> f64 {
        dash_len * (self.dash_count + 1) as f64 - self.drawn_len
    }

    fn point_at(&self, path: &PathModel, portion: f64) -> Point {
        let start = path.points()[self.segment];
        start + self.delta * portion
    }

    fn portion(&self, along: f64) -> f64 {
        if self.segment_len > 0.0 {
            (along / self.segment_len).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Everything one frame's advance produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalkTick {
    /// Visible sub-segments in traversal order.
    pub segments: Vec<Line>,
    /// The pen's leading position after this frame; the camera follows it.
    pub focus: Point,
    /// Arc length consumed by this frame.
    pub consumed: f64,
    /// Dash toggles crossed by this frame.
    pub toggles: u64,
    /// True if the walk reached the end of the path during this frame.
    pub finished: bool,
}

impl WalkTick {
    /// Total length of the visible sub-segments.
    pub fn drawn_length(&self) -> f64 {
        self.segments.iter().map(|l| l.length()).sum()
    }
}

/// Advance `state` along `path` by up to `budget` arc length.
///
/// `dash_len` must be positive; callers validate it up front.
pub fn advance(
    path: &PathModel,
    dash_len: f64,
    mut state: DashState,
    budget: f64,
) -> (DashState, WalkTick) {
    let start_len = state.drawn_len;
    let start_toggles = state.dash_count;
    let mut tick = WalkTick {
        focus: state.focus,
        ..WalkTick::default()
    };
    let mut budget_left = budget.max(0.0);

    while budget_left > 0.0 {
        if state.is_past_end(path) {
            state.drawn_len = path.length();
            state.focus = path.last_point().unwrap_or(state.focus);
            tick.finished = true;
            break;
        }

        let to_segment_end = state.segment_len - state.segment_drawn;
        let (boundary, step) = nearest_boundary(
            state.distance_to_dash_toggle(dash_len),
            to_segment_end,
            budget_left,
        );

        let s_portion = state.portion(state.segment_drawn);
        let e_portion = state.portion(state.segment_drawn + step);
        let end = state.point_at(path, e_portion);
        if state.on_draw && step > 0.0 {
            tick.segments
                .push(Line::new(state.point_at(path, s_portion), end));
        }
        state.focus = end;

        state.segment_drawn = (state.segment_drawn + step).min(state.segment_len);
        state.drawn_len += step;

        match boundary {
            Boundary::Segment => {
                let next = state.segment + 1;
                state.enter_segment(path, next);
                if state.is_past_end(path) {
                    state.drawn_len = path.length();
                    state.focus = path.last_point().unwrap_or(end);
                    tick.finished = true;
                    break;
                }
            }
            Boundary::Dash => {
                state.on_draw = !state.on_draw;
                state.dash_count += 1;
            }
            Boundary::Budget => {}
        }

        budget_left = if boundary == Boundary::Budget {
            0.0
        } else {
            budget_left - step
        };
    }

    tick.focus = state.focus;
    tick.consumed = state.drawn_len - start_len;
    tick.toggles = state.dash_count - start_toggles;
    (state, tick)
}

/// Owns a walk's state for the per-frame driver loop.
#[derive(Clone, Debug)]
pub struct DashWalker {
    state: DashState,
    dash_len: f64,
    speed: f64,
}

impl DashWalker {
    pub fn new(path: &PathModel, dash_len: f64, speed: f64) -> Self {
        Self {
            state: DashState::start(path),
            dash_len,
            speed,
        }
    }

    pub fn state(&self) -> &DashState {
        &self.state
    }

    pub fn focus(&self) -> Point {
        self.state.focus
    }

    /// Nothing left to draw: within [`DONE_TOLERANCE`] of the end, or past the last segment.
    pub fn is_done(&self, path: &PathModel) -> bool {
        self.state.drawn_len >= path.length() - DONE_TOLERANCE || self.state.is_past_end(path)
    }

    /// Advance by one frame's budget.
    pub fn tick(&mut self, path: &PathModel) -> WalkTick {
        let (next, tick) = advance(path, self.dash_len, self.state, self.speed);
        self.state = next;
        tick
    }
}
