#![allow(dead_code)]

use std::sync::Once;

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use civic_core::FixedClock;

pub const SIBLING: &str = "http://www.seattlechannel.org/CityCouncil";
pub const VIDEO: &str = "http://video.seattle.gov:8080/media/council/tests_032919.mp4";
pub const THUMBNAIL: &str =
    "http://www.seattlechannel.org/images/seattlechannel/videoimages/channelGeneric.jpg";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(civic_logging::initialize_for_tests);
}

pub fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2019, 3, 29, 20, 0, 0).unwrap())
}

/// `m/d/yy` as the player call writes it.
pub fn short_date(date: NaiveDate) -> String {
    format!("{}/{}/{:02}", date.month(), date.day(), date.year() % 100)
}

/// `m/d/yyyy` as the date element shows it.
pub fn long_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

fn player_call(video: &str, thumbnail: &str, body: &str, date: &str) -> String {
    format!(
        "javascript:loadJWPlayer7('{video}','{thumbnail}', &quot;&lt;p&gt;The City of Seattle conducts a hearing on testing Council Data Project parsers. &lt;/p&gt;&lt;p&gt;&lt;/p&gt;&quot;, '{body}', '{date}', '1:31:24', '9021807', false,'x93428', '', '', '', '', '', '', '', '', ''); return false;"
    )
}

/// One listing row shaped like the Seattle Channel markup.
pub fn row(date: NaiveDate, video_id: &str, body: &str, excerpt: &str) -> String {
    let short = short_date(date);
    let long = long_date(date);
    let image_call = player_call(VIDEO, "/images/seattlechannel/videoimages/channelGeneric.jpg", body, &short);
    let title_call = player_call(VIDEO, "images/seattlechannel/videoimages/channelGeneric.jpg", body, &short);
    format!(
        r#"<div class="row borderBottomNone paginationItem"><div class="col-xs-12 col-sm-4 col-md-3"><a href="/testing?videoid={video_id}" onclick="{image_call}" target=""><img alt="{body} {short}" class="img-responsive" src="images/seattlechannel/videoimages/channelGeneric.jpg" title="{body} {short}"/></a></div><div class="col-xs-12 col-sm-8 col-md-9"><div class="titleDateContainer"><h2 class="paginationTitle"><a href="/testing?videoid={video_id}" onclick="{title_call}" title="{body} {short}">{body}</a></h2><div class="videoDate">{long}</div></div><div class="titleExcerptText"><p>{excerpt}</p><p></p></div></div></div>"#
    )
}

/// A row whose anchors carry no player call at all.
pub fn row_without_player(date: NaiveDate) -> String {
    format!(
        r#"<div class="row paginationItem"><div class="titleDateContainer"><h2 class="paginationTitle"><a href="/testing?videoid=broken">Broken Row</a></h2><div class="videoDate">{}</div></div><div class="titleExcerptText"><p>Agenda: Nothing.</p></div></div>"#,
        long_date(date)
    )
}

pub fn page(rows: &[String], next_href: Option<&str>) -> String {
    let next = next_href
        .map(|href| format!(r#"<a class="paginationNext" href="{href}">Next</a>"#))
        .unwrap_or_default();
    format!(
        "<html><head><title>City Council</title></head><body><div class=\"paginationContainer\">{}</div>{next}</body></html>",
        rows.join("")
    )
}
