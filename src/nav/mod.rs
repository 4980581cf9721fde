//! Page routing and fade transitions.
//!
//! Three routes are known. Leaving a page fades its content out and the
//! actual navigation happens once a timer matched to the transition fires.
//! Timers are never cancelled: if two navigations are started back to back,
//! whichever timer fires last decides the final page.

use crate::app::event::{Timer, TimerKind};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    AddData,
    ViewData,
    Settings,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::AddData, Route::ViewData, Route::Settings];

    pub fn path(self) -> &'static str {
        match self {
            Route::AddData => "/",
            Route::ViewData => "/view-data",
            Route::Settings => "/settings",
        }
    }

    /// Pre-router paths that still resolve to the same page.
    pub fn legacy_path(self) -> &'static str {
        match self {
            Route::AddData => "/index.html",
            Route::ViewData => "/view_data.html",
            Route::Settings => "/settings.html",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::AddData => "Add Data",
            Route::ViewData => "View Data",
            Route::Settings => "Settings",
        }
    }

    pub fn matches(self, path: &str) -> bool {
        path == self.path() || path == self.legacy_path()
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|r| r.matches(path))
    }
}

/// Opacity of the page content, animated linearly between two levels.
#[derive(Debug, Clone)]
pub struct PageFade {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl PageFade {
    pub fn new(level: f32, duration: Duration, now: Instant) -> Self {
        Self {
            from: level,
            to: level,
            started: now,
            duration,
        }
    }

    pub fn level(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        (self.level(now) - self.to).abs() > f32::EPSILON
    }

    /// Start a transition from wherever the fade currently is.
    pub fn fade_to(&mut self, target: f32, now: Instant) {
        self.from = self.level(now);
        self.to = target;
        self.started = now;
    }

    /// Jump to `level` without animating.
    pub fn set(&mut self, level: f32, now: Instant) {
        self.from = level;
        self.to = level;
        self.started = now;
    }
}

pub struct NavigationController {
    location: String,
    fade: PageFade,
    transition: Duration,
    fade_in_delay: Duration,
}

impl NavigationController {
    pub fn new(location: impl Into<String>, transition: Duration, fade_in_delay: Duration, now: Instant) -> Self {
        Self {
            location: location.into(),
            fade: PageFade::new(1.0, transition, now),
            transition,
            fade_in_delay,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Route of the current location, used to highlight the dock.
    pub fn current_route(&self) -> Option<Route> {
        Route::from_path(&self.location)
    }

    pub fn is_current(&self, route: Route) -> bool {
        route.matches(&self.location)
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        self.fade.level(now)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.fade.is_animating(now)
    }

    /// Page load: content starts hidden and fades in after a short delay.
    pub fn load(&mut self, now: Instant) -> Timer {
        self.fade.set(0.0, now);
        Timer {
            after: self.fade_in_delay,
            kind: TimerKind::FadeIn,
        }
    }

    pub fn fade_in(&mut self, now: Instant) {
        self.fade.fade_to(1.0, now);
    }

    /// Fade out and schedule navigation to `target`. Navigating to the page
    /// already shown does nothing.
    pub fn fade_and_navigate(&mut self, target: Route, now: Instant) -> Option<Timer> {
        if self.is_current(target) {
            return None;
        }
        self.fade.fade_to(0.0, now);
        Some(Timer {
            after: self.transition,
            kind: TimerKind::Navigate(target),
        })
    }

    /// Complete a navigation: change location and start the new page's load.
    pub fn arrive(&mut self, target: Route, now: Instant) -> Timer {
        self.location = target.path().to_string();
        self.load(now)
    }
}
