mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::America::Los_Angeles;
use civic_core::SystemClock;
use civic_engine::{
    content_key, EventRecordParser, SiteConfig, UnparsableFragmentError,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{clock, init_logging, row, row_without_player, SIBLING, THUMBNAIL, VIDEO};

fn march_29() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 3, 29).unwrap()
}

#[test]
fn reference_row_parses_into_a_record() {
    init_logging();
    let rules = SiteConfig::seattle_channel().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);

    let html = row(
        march_29(),
        "x99999",
        "Example Body on Tests",
        "Agenda: Public Comment; CB 999999.",
    );
    let record = parser.parse_html(&html, SIBLING).expect("row parses");

    assert_eq!(record.agenda, vec!["Public Comment", "CB 999999"]);
    assert_eq!(record.body, "Example Body on Tests");
    assert_eq!(record.event_datetime, march_29());
    assert_eq!(
        record.source_url,
        "http://www.seattlechannel.org/testing?videoid=x99999"
    );
    assert_eq!(record.thumbnail_url, THUMBNAIL);
    assert_eq!(record.video_url, VIDEO);
    assert_eq!(
        record.parsed_datetime,
        Los_Angeles.with_ymd_and_hms(2019, 3, 29, 0, 0, 0).unwrap()
    );
    assert_eq!(record.key.len(), 64);
    assert!(record.key.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(record.key, content_key(&record.key_fields()));
    assert!(record.key_is_current());
}

#[test]
fn todays_row_lands_on_civic_midnight() {
    init_logging();
    let rules = SiteConfig::default().compile().unwrap();
    let parser = EventRecordParser::new(&rules, &SystemClock);
    let today = Utc::now().with_timezone(&Los_Angeles).date_naive();

    let html = row(today, "x99999", "Example Body on Tests", "Agenda: Public Comment; CB 999999.");
    let record = parser.parse_html(&html, SIBLING).unwrap();

    assert_eq!(record.event_datetime, today);
    assert_eq!(
        record.parsed_datetime,
        Los_Angeles
            .from_local_datetime(&today.and_hms_opt(0, 0, 0).unwrap())
            .earliest()
            .unwrap()
    );
    assert_eq!(record.agenda, vec!["Public Comment", "CB 999999"]);
}

#[test]
fn emitted_mapping_has_only_record_fields() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let record = parser
        .parse_html(
            &row(march_29(), "x1", "Full Council", "Agenda: Roll Call."),
            SIBLING,
        )
        .unwrap();

    let mapping = record.to_mapping();
    let mut keys: Vec<_> = mapping.keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "agenda",
            "body",
            "event_datetime",
            "key",
            "source_url",
            "thumbnail_url",
            "video_url",
        ]
    );
    assert_eq!(mapping["event_datetime"], json!("2019-03-29"));
    assert_eq!(mapping["agenda"], json!(["Roll Call"]));
    assert_eq!(mapping["key"], json!(record.key));
}

#[test]
fn reparsing_the_same_row_yields_the_same_key() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let html = row(march_29(), "x5", "Parks Committee", "Agenda: A; B; C.");

    let first = parser.parse_html(&html, SIBLING).unwrap();
    let second = parser.parse_html(&html, SIBLING).unwrap();
    assert_eq!(first, second);

    let other = parser
        .parse_html(&row(march_29(), "x6", "Parks Committee", "Agenda: A; B; C."), SIBLING)
        .unwrap();
    assert_ne!(first.key, other.key);
}

#[test]
fn excerpt_without_separator_gives_empty_agenda() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let record = parser
        .parse_html(
            &row(march_29(), "x2", "Full Council", "Budget hearing; public welcome."),
            SIBLING,
        )
        .unwrap();
    assert!(record.agenda.is_empty());
}

#[test]
fn paragraphs_after_the_agenda_are_not_agenda_items() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let record = parser
        .parse_html(
            &row(
                march_29(),
                "x7",
                "Full Council",
                "Agenda: Public Comment; CB 999999.</p><p>Watch live on Seattle Channel 21.",
            ),
            SIBLING,
        )
        .unwrap();
    assert_eq!(record.agenda, vec!["Public Comment", "CB 999999"]);
}

#[test]
fn agenda_paragraph_need_not_come_first() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let record = parser
        .parse_html(
            &row(
                march_29(),
                "x8",
                "Full Council",
                "Meeting rescheduled from 3/28.</p><p>Agenda: Roll Call; <b>CB 1</b>.",
            ),
            SIBLING,
        )
        .unwrap();
    assert_eq!(record.agenda, vec!["Roll Call", "CB 1"]);
}

#[test]
fn body_falls_back_to_title_text() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let html = r#"<div class="paginationItem"><h2 class="paginationTitle"><a href="/v?id=7" onclick="play('http://video.seattle.gov/a.mp4', 'images/a.jpg', '', '  ', '4/1/2019')">Select Budget
        Committee.</a></h2></div>"#;
    let record = parser.parse_html(html, SIBLING).unwrap();
    assert_eq!(record.body, "Select Budget Committee");
    assert_eq!(record.thumbnail_url, "http://www.seattlechannel.org/images/a.jpg");
    assert_eq!(record.source_url, "http://www.seattlechannel.org/v?id=7");
    assert!(record.agenda.is_empty());
}

#[test]
fn date_falls_back_to_date_element_and_thumbnail_to_image() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let html = r#"<div class="paginationItem"><img src="/thumbs/b.png"><h2 class="paginationTitle"><a onclick="play('http://video.seattle.gov/b.mp4')">Council Briefing</a></h2><div class="videoDate">4/2/2019</div></div>"#;
    let record = parser.parse_html(html, SIBLING).unwrap();
    assert_eq!(record.event_datetime, NaiveDate::from_ymd_opt(2019, 4, 2).unwrap());
    assert_eq!(record.thumbnail_url, "http://www.seattlechannel.org/thumbs/b.png");
    assert_eq!(record.body, "Council Briefing");
    // No href anywhere: the sibling URL stands in.
    assert_eq!(record.source_url, SIBLING);
}

#[test]
fn missing_player_invocation_is_unparsable() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let err = parser
        .parse_html(&row_without_player(march_29()), SIBLING)
        .unwrap_err();
    assert_eq!(
        err,
        UnparsableFragmentError::MissingElement("player invocation")
    );
}

#[test]
fn missing_title_is_unparsable() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let html = r#"<div class="paginationItem"><a onclick="play('http://v/a.mp4', 'a.jpg', '', 'Body', '4/1/19')">x</a></div>"#;
    assert_eq!(
        parser.parse_html(html, SIBLING).unwrap_err(),
        UnparsableFragmentError::MissingElement("title")
    );
}

#[test]
fn missing_video_and_date_are_unparsable() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);

    let no_video = r#"<div><h2 class="paginationTitle"><a onclick="play('', 'a.jpg', '', 'Body', '4/1/19')">T</a></h2></div>"#;
    assert_eq!(
        parser.parse_html(no_video, SIBLING).unwrap_err(),
        UnparsableFragmentError::MissingElement("video link")
    );

    let no_date = r#"<div><h2 class="paginationTitle"><a onclick="play('http://v/a.mp4', 'a.jpg', '', 'Body')">T</a></h2></div>"#;
    assert_eq!(
        parser.parse_html(no_date, SIBLING).unwrap_err(),
        UnparsableFragmentError::MissingElement("date")
    );

    let bad_date = r#"<div><h2 class="paginationTitle"><a onclick="play('http://v/a.mp4', 'a.jpg', '', 'Body', 'TBD')">T</a></h2></div>"#;
    assert_eq!(
        parser.parse_html(bad_date, SIBLING).unwrap_err(),
        UnparsableFragmentError::InvalidDate("TBD".into())
    );
}

#[test]
fn relative_media_against_schemeless_sibling_is_a_route_error() {
    let rules = SiteConfig::default().compile().unwrap();
    let clock = clock();
    let parser = EventRecordParser::new(&rules, &clock);
    let html = row(march_29(), "x3", "Full Council", "Agenda: A.");
    let err = parser
        .parse_html(&html, "www.seattlechannel.org/CityCouncil")
        .unwrap_err();
    assert!(matches!(err, UnparsableFragmentError::Route(_)));
}
