use chrono::{NaiveDate, Weekday};
use trendmuse::presets::{PresetCatalog, Season, TimeSlot};

#[test]
fn every_hour_maps_to_exactly_one_slot() {
    for hour in 0..24u32 {
        let slot = TimeSlot::from_hour(hour);
        let expected = match hour {
            5..=11 => TimeSlot::Morning,
            12..=16 => TimeSlot::Afternoon,
            17..=20 => TimeSlot::Evening,
            _ => TimeSlot::Night,
        };
        assert_eq!(slot, expected, "hour {}", hour);
    }
}

#[test]
fn slot_boundaries_are_half_open() {
    assert_eq!(TimeSlot::from_hour(4), TimeSlot::Night);
    assert_eq!(TimeSlot::from_hour(5), TimeSlot::Morning);
    assert_eq!(TimeSlot::from_hour(11), TimeSlot::Morning);
    assert_eq!(TimeSlot::from_hour(12), TimeSlot::Afternoon);
    assert_eq!(TimeSlot::from_hour(16), TimeSlot::Afternoon);
    assert_eq!(TimeSlot::from_hour(17), TimeSlot::Evening);
    assert_eq!(TimeSlot::from_hour(20), TimeSlot::Evening);
    assert_eq!(TimeSlot::from_hour(21), TimeSlot::Night);
}

#[test]
fn every_month_maps_to_a_season() {
    let expected = [
        (1, Season::Winter),
        (2, Season::Winter),
        (3, Season::Spring),
        (4, Season::Spring),
        (5, Season::Spring),
        (6, Season::Summer),
        (7, Season::Summer),
        (8, Season::Summer),
        (9, Season::Fall),
        (10, Season::Fall),
        (11, Season::Fall),
        (12, Season::Winter),
    ];
    for (month, season) in expected {
        assert_eq!(Season::from_month(month), season, "month {}", month);
    }
}

#[test]
fn seasonal_set_is_deterministic_and_non_empty() {
    let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
    let first = PresetCatalog::seasonal_set(date);
    let second = PresetCatalog::seasonal_set(date);
    assert_eq!(first.hashtags, second.hashtags);
    assert_eq!(first.keywords, second.keywords);
    assert!(!first.hashtags.is_empty());
    assert!(!first.keywords.is_empty());
}

#[test]
fn every_slot_set_is_non_empty() {
    for slot in [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::Night,
    ] {
        let set = PresetCatalog::time_slot_set(slot);
        assert!(!set.hashtags.is_empty(), "{}", slot.label());
        assert!(!set.keywords.is_empty(), "{}", slot.label());
    }
}

#[test]
fn weekday_challenges_cover_weekdays_only() {
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ] {
        assert!(PresetCatalog::weekday_challenge(weekday).is_some());
    }
    assert!(PresetCatalog::weekday_challenge(Weekday::Sat).is_none());
    assert!(PresetCatalog::weekday_challenge(Weekday::Sun).is_none());
}
