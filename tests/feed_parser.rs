use tw_trends_bot::models::{NewsRef, TrendItem};
use tw_trends_bot::service::trends::{parse, parse_titles_only};

const FIXTURE: &str = include_str!("fixtures/trends_tw.xml");

const TWO_CATS: &str = r#"<?xml version="1.0"?>
<rss xmlns:ht="https://trends.google.com/trending/rss"><channel>
  <item>
    <title>Cat A</title>
    <ht:approx_traffic>50,000+</ht:approx_traffic>
    <ht:news_item>
      <ht:news_item_title>Story 1</ht:news_item_title>
      <ht:news_item_url>http://x/1</ht:news_item_url>
    </ht:news_item>
  </item>
  <item>
    <title>Cat B</title>
  </item>
</channel></rss>"#;

#[test]
fn extracts_items_with_traffic_and_news() {
    let items = parse(TWO_CATS).expect("well-formed feed");
    assert_eq!(
        items,
        vec![
            TrendItem {
                title: Some("Cat A".into()),
                traffic: Some("50,000+".into()),
                news: vec![NewsRef {
                    title: Some("Story 1".into()),
                    source: None,
                    url: Some("http://x/1".into()),
                }],
            },
            TrendItem {
                title: Some("Cat B".into()),
                traffic: None,
                news: vec![],
            },
        ]
    );
}

#[test]
fn titles_only_mode_matches_full_mode_titles() {
    let titles = parse_titles_only(TWO_CATS).expect("well-formed feed");
    assert_eq!(titles, vec!["Cat A".to_string(), "Cat B".to_string()]);
}

#[test]
fn accepts_bytes_and_strings() {
    assert_eq!(
        parse(TWO_CATS.as_bytes()).unwrap(),
        parse(TWO_CATS.to_string()).unwrap()
    );
}

#[test]
fn parses_realistic_feed_in_document_order() {
    let items = parse(FIXTURE).expect("fixture parses");
    let titles: Vec<_> = items.iter().map(|i| i.title.as_deref().unwrap()).collect();
    assert_eq!(titles, vec!["颱風假", "中華職棒", "台積電"]);

    let first = &items[0];
    assert_eq!(first.traffic.as_deref(), Some("200,000+"));
    assert_eq!(first.news.len(), 2);
    assert_eq!(first.news[0].source.as_deref(), Some("自由時報"));
    assert_eq!(
        first.news[1].title.as_deref(),
        Some("颱風路徑最新預測 & 雨量警戒")
    );

    assert!(items[2].news.is_empty());
}

#[test]
fn channel_title_is_not_an_item() {
    let titles = parse_titles_only(FIXTURE).unwrap();
    assert!(!titles.iter().any(|t| t == "Daily Search Trends"));
    assert_eq!(titles.len(), 3);
}

#[test]
fn trims_surrounding_whitespace_in_titles() {
    let xml = "<rss><channel><item><title>  Foo Bar  </title></item></channel></rss>";
    assert_eq!(parse(xml).unwrap()[0].title.as_deref(), Some("Foo Bar"));
    assert_eq!(parse_titles_only(xml).unwrap(), vec!["Foo Bar".to_string()]);

    let fixture = parse(FIXTURE).unwrap();
    assert_eq!(fixture[1].title.as_deref(), Some("中華職棒"));
}

#[test]
fn news_item_without_url_keeps_entry_with_null_url() {
    let items = parse(FIXTURE).unwrap();
    assert_eq!(
        items[1].news,
        vec![NewsRef {
            title: Some("開幕戰門票秒殺".into()),
            source: Some("ETtoday".into()),
            url: None,
        }]
    );
}

#[test]
fn missing_title_is_none_and_skipped_in_titles_mode() {
    let xml = r#"<rss xmlns:ht="https://trends.google.com/trending/rss"><channel>
        <item><ht:approx_traffic>100+</ht:approx_traffic></item>
        <item><title>Named</title></item>
    </channel></rss>"#;
    let items = parse(xml).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, None);
    assert_eq!(items[0].traffic.as_deref(), Some("100+"));
    assert_eq!(parse_titles_only(xml).unwrap(), vec!["Named".to_string()]);
}

#[test]
fn zero_items_is_an_empty_result() {
    let xml = r#"<rss version="2.0"><channel><title>Nothing</title></channel></rss>"#;
    assert!(parse(xml).unwrap().is_empty());
    assert!(parse_titles_only(xml).unwrap().is_empty());
}

#[test]
fn items_are_found_at_any_depth() {
    let xml = "<root><item><title>top</title></item>\
               <a><b><item><title>deep</title></item></b></a></root>";
    assert_eq!(
        parse_titles_only(xml).unwrap(),
        vec!["top".to_string(), "deep".to_string()]
    );
}

#[test]
fn repeated_titles_are_not_deduplicated() {
    let xml = "<rss><channel>\
               <item><title>Same</title></item><item><title>Same</title></item>\
               </channel></rss>";
    assert_eq!(parse(xml).unwrap().len(), 2);
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let unclosed = r#"<rss><channel><item><title>Cat A</title></item>"#;
    let err = parse(unclosed).unwrap_err();
    assert!(!err.message.is_empty());
    assert!(err.to_string().contains("malformed XML"));

    assert!(parse_titles_only(unclosed).is_err());
    assert!(parse("<rss><item><title>x</item></rss>").is_err());
    assert!(parse("not xml at all").is_err());
    assert!(parse("<rss><item><title>&bogus;</title></item></rss>").is_err());
}

#[test]
fn attribute_and_name_errors_are_parse_errors() {
    let cases = [
        "<rss><channel><item foo=bar><title>A</title></item></channel></rss>",
        r#"<rss><channel><item a="1" a="2"><title>A</title></item></channel></rss>"#,
        "<rss><channel><item><ht:approx_traffic>1+</ht:approx_traffic></item></channel></rss>",
        "<1bad/>",
    ];
    for xml in cases {
        assert!(parse(xml).is_err(), "parse accepted {xml}");
        assert!(parse_titles_only(xml).is_err(), "titles mode accepted {xml}");
    }
}

#[test]
fn declared_prefix_on_item_attribute_is_accepted() {
    let xml = r#"<rss xmlns:ht="https://trends.google.com/trending/rss"><channel>
        <item ht:rank="1"><title>A</title></item>
    </channel></rss>"#;
    assert_eq!(parse_titles_only(xml).unwrap(), vec!["A".to_string()]);
}

#[test]
fn title_ignores_text_after_a_child_element() {
    let xml = "<rss><channel><item><title>A<b>x</b>B</title></item></channel></rss>";
    let items = parse(xml).unwrap();
    assert_eq!(items[0].title.as_deref(), Some("A"));
    assert_eq!(parse_titles_only(xml).unwrap(), vec!["A".to_string()]);
}

#[test]
fn serializes_absent_fields_as_null() {
    let items = parse(TWO_CATS).unwrap();
    let json = serde_json::to_value(&items).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"title": "Cat A", "traffic": "50,000+", "news": [
                {"title": "Story 1", "source": null, "url": "http://x/1"}
            ]},
            {"title": "Cat B", "traffic": null, "news": []}
        ])
    );
}
