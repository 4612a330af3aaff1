use chrono::{Datelike, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    /// Half-open hour bands: morning [5,12), afternoon [12,17),
    /// evening [17,21), night otherwise.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeSlot::Morning,
            12..=16 => TimeSlot::Afternoon,
            17..=20 => TimeSlot::Evening,
            _ => TimeSlot::Night,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::Night => "night",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PresetSet {
    pub hashtags: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub emojis: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct WeekdayChallenge {
    pub tag: &'static str,
    pub keyword: &'static str,
}

static SPRING: PresetSet = PresetSet {
    hashtags: &["springvibes", "bloom", "freshstart", "picnicday", "cherryblossom"],
    keywords: &["spring", "blossom", "picnic", "garden", "renewal"],
    emojis: &["🌸", "🌷", "🍃"],
};

static SUMMER: PresetSet = PresetSet {
    hashtags: &["summervibes", "beachday", "goldenhour", "roadtrip", "icecream"],
    keywords: &["summer", "beach", "sunshine", "vacation", "festival"],
    emojis: &["☀️", "🏖️", "🍉"],
};

static FALL: PresetSet = PresetSet {
    hashtags: &["autumnvibes", "cozyseason", "fallfashion", "pumpkinspice", "harvest"],
    keywords: &["autumn", "harvest", "cozy", "foliage", "sweater"],
    emojis: &["🍂", "🎃", "☕"],
};

static WINTER: PresetSet = PresetSet {
    hashtags: &["wintermood", "snowday", "holidayseason", "hotchocolate", "newyear"],
    keywords: &["winter", "snow", "holiday", "fireplace", "resolution"],
    emojis: &["❄️", "⛄", "🎄"],
};

static MORNING: PresetSet = PresetSet {
    hashtags: &["morningmotivation", "sunrise", "coffeetime", "morningroutine"],
    keywords: &["morning", "sunrise", "coffee", "breakfast"],
    emojis: &["🌅", "☕"],
};

static AFTERNOON: PresetSet = PresetSet {
    hashtags: &["lunchbreak", "afternoonvibes", "worklife", "middaymood"],
    keywords: &["lunch", "afternoon", "productivity", "break"],
    emojis: &["🥗", "💼"],
};

static EVENING: PresetSet = PresetSet {
    hashtags: &["eveningmood", "sunsetlover", "dinnertime", "unwind"],
    keywords: &["evening", "sunset", "dinner", "relax"],
    emojis: &["🌇", "🍷"],
};

static NIGHT: PresetSet = PresetSet {
    hashtags: &["latenight", "nightowl", "midnightthoughts", "stargazing"],
    keywords: &["night", "midnight", "dream", "stars"],
    emojis: &["🌙", "✨"],
};

pub struct PresetCatalog;

impl PresetCatalog {
    pub fn seasonal_set(date: NaiveDate) -> &'static PresetSet {
        Self::season_set(Season::from_month(date.month()))
    }

    pub fn season_set(season: Season) -> &'static PresetSet {
        match season {
            Season::Spring => &SPRING,
            Season::Summer => &SUMMER,
            Season::Fall => &FALL,
            Season::Winter => &WINTER,
        }
    }

    pub fn time_slot_set(slot: TimeSlot) -> &'static PresetSet {
        match slot {
            TimeSlot::Morning => &MORNING,
            TimeSlot::Afternoon => &AFTERNOON,
            TimeSlot::Evening => &EVENING,
            TimeSlot::Night => &NIGHT,
        }
    }

    /// Weekend days carry no challenge.
    pub fn weekday_challenge(weekday: Weekday) -> Option<&'static WeekdayChallenge> {
        match weekday {
            Weekday::Mon => Some(&WeekdayChallenge {
                tag: "mondaymotivation",
                keyword: "motivation",
            }),
            Weekday::Tue => Some(&WeekdayChallenge {
                tag: "tuesdaytips",
                keyword: "tips",
            }),
            Weekday::Wed => Some(&WeekdayChallenge {
                tag: "wednesdaywisdom",
                keyword: "wisdom",
            }),
            Weekday::Thu => Some(&WeekdayChallenge {
                tag: "throwbackthursday",
                keyword: "throwback",
            }),
            Weekday::Fri => Some(&WeekdayChallenge {
                tag: "fridayfeeling",
                keyword: "weekend",
            }),
            Weekday::Sat | Weekday::Sun => None,
        }
    }
}
