// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chesscal::models::Tournament;
use chesscal::selection::{Action, Click, Mode, Selection};
use chrono::NaiveDate;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn booked() -> Vec<Tournament> {
    let mut t = Tournament::new("Spring Open", day("2025-04-10"), day("2025-04-12"));
    t.id = "spring".into();
    vec![t]
}

#[test]
fn starts_in_view_and_opens_tournaments() {
    let ts = booked();
    let mut sel = Selection::new();
    assert_eq!(sel.mode(), Mode::View);
    assert_eq!(
        sel.click(day("2025-04-11"), &ts),
        Click::Opened { id: "spring".into() }
    );
    assert_eq!(sel.click(day("2025-05-01"), &ts), Click::Ignored);
    assert_eq!(sel.confirm(), None);
    assert_eq!(sel.mode(), Mode::View);
}

#[test]
fn add_mode_collects_start_then_end() {
    let ts = booked();
    let mut sel = Selection::new();
    sel.enter(Mode::Add);
    assert_eq!(sel.click(day("2025-05-03"), &ts), Click::Started(day("2025-05-03")));
    assert_eq!(
        sel.click(day("2025-05-07"), &ts),
        Click::Completed {
            start: day("2025-05-03"),
            end: day("2025-05-07")
        }
    );
    assert_eq!(
        sel.confirm(),
        Some(Action::Create {
            start: day("2025-05-03"),
            end: day("2025-05-07")
        })
    );
    assert_eq!(sel.mode(), Mode::View);
    assert_eq!(sel.range(), None);
}

#[test]
fn earlier_second_click_swaps_the_range() {
    let mut sel = Selection::new();
    sel.enter(Mode::Add);
    sel.click(day("2025-05-07"), &[]);
    assert_eq!(
        sel.click(day("2025-05-03"), &[]),
        Click::Completed {
            start: day("2025-05-03"),
            end: day("2025-05-07")
        }
    );
}

#[test]
fn third_click_starts_over_and_needs_an_end() {
    let mut sel = Selection::new();
    sel.enter(Mode::Add);
    sel.click(day("2025-05-01"), &[]);
    sel.click(day("2025-05-02"), &[]);
    assert_eq!(sel.click(day("2025-06-01"), &[]), Click::Started(day("2025-06-01")));
    assert_eq!(sel.range(), Some((day("2025-06-01"), day("2025-06-01"))));
    assert_eq!(sel.confirm(), None);
    assert_eq!(sel.mode(), Mode::Add);
}

#[test]
fn one_day_event_needs_the_same_day_twice() {
    let mut sel = Selection::new();
    sel.enter(Mode::Add);
    sel.click(day("2025-05-01"), &[]);
    assert_eq!(sel.confirm(), None);
    assert_eq!(
        sel.click(day("2025-05-01"), &[]),
        Click::Completed {
            start: day("2025-05-01"),
            end: day("2025-05-01")
        }
    );
    assert_eq!(
        sel.confirm(),
        Some(Action::Create {
            start: day("2025-05-01"),
            end: day("2025-05-01")
        })
    );
    assert_eq!(sel.mode(), Mode::View);
}

#[test]
fn add_mode_ignores_booked_days() {
    let ts = booked();
    let mut sel = Selection::new();
    sel.enter(Mode::Add);
    assert_eq!(sel.click(day("2025-04-10"), &ts), Click::Ignored);
    assert_eq!(sel.range(), None);
    // nothing to confirm: mode stays
    assert_eq!(sel.confirm(), None);
    assert_eq!(sel.mode(), Mode::Add);
}

#[test]
fn delete_mode_marks_the_whole_tournament() {
    let ts = booked();
    let mut sel = Selection::new();
    sel.enter(Mode::Delete);
    assert_eq!(sel.click(day("2025-05-01"), &ts), Click::Ignored);
    assert_eq!(
        sel.click(day("2025-04-12"), &ts),
        Click::Marked { id: "spring".into() }
    );
    assert_eq!(sel.marked(), Some("spring"));
    assert_eq!(sel.range(), Some((day("2025-04-10"), day("2025-04-12"))));
    assert_eq!(sel.confirm(), Some(Action::Delete { id: "spring".into() }));
    assert_eq!(sel.mode(), Mode::View);
}

#[test]
fn cancel_returns_to_view_from_any_mode() {
    let ts = booked();
    for mode in [Mode::View, Mode::Add, Mode::Delete] {
        let mut sel = Selection::new();
        sel.enter(mode);
        sel.click(day("2025-04-11"), &ts);
        sel.click(day("2025-07-01"), &ts);
        sel.cancel();
        assert_eq!(sel, Selection::new());
    }
}

#[test]
fn switching_mode_drops_the_selection() {
    let mut sel = Selection::new();
    sel.enter(Mode::Add);
    sel.click(day("2025-05-01"), &[]);
    sel.enter(Mode::Delete);
    assert_eq!(sel.range(), None);
    assert_eq!("add".parse::<Mode>().unwrap(), Mode::Add);
    assert!("erase".parse::<Mode>().is_err());
}
