use chrono::{Local, NaiveDate, NaiveDateTime};
use czml_core::time::format_datetime;
use czml_core::{
    inputs, Billboard, Color, CoordinateRecord, Coordinates, Czml, CzmlError, CzmlPacket,
    DateTimeAware, GeoPoint, Input, Label, Point, Position, PropertyObject, TimeOrNumber,
};
use serde_json::json;

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn y2k() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn iso(dt: NaiveDateTime) -> TimeOrNumber {
    TimeOrNumber::Time(format_datetime(dt))
}

#[test]
fn datetime_aware_fields_canonicalize_every_input_form() {
    let mut d = DateTimeAware::default();
    let now = now();
    let today = now.date();
    let now_iso = format_datetime(now);

    d.epoch.set(now).unwrap();
    assert_eq!(d.epoch.get(), Some(&now_iso));
    d.epoch.set(now_iso.as_str()).unwrap();
    assert_eq!(d.epoch.get(), Some(&now_iso));
    d.epoch.set(today).unwrap();
    assert_eq!(d.epoch.get(), Some(&today.format("%Y-%m-%d").to_string()));
    d.epoch.set(Input::Null).unwrap();
    assert_eq!(d.epoch.get(), None);

    for field in [&mut d.next_time, &mut d.previous_time] {
        field.set(now).unwrap();
        assert_eq!(field.get(), Some(&TimeOrNumber::Time(now_iso.clone())));
        field.set(1).unwrap();
        assert_eq!(field.get(), Some(&TimeOrNumber::Number(1.0)));
        field.set("2").unwrap();
        assert_eq!(field.get(), Some(&TimeOrNumber::Number(2.0)));
        field.set(None::<f64>).unwrap();
        assert_eq!(field.get(), None);
    }
}

#[test]
fn coordinates_decode_every_documented_shape() {
    let c = Coordinates::decode(&inputs![0, 1]).unwrap();
    assert_eq!(c.records(), &[CoordinateRecord::new(0.0, 1.0, 0.0)]);

    let c = Coordinates::decode(&inputs![0, 1, 2]).unwrap();
    assert_eq!(c.records(), &[CoordinateRecord::new(0.0, 1.0, 2.0)]);

    let now = now();
    let c = Coordinates::decode(&inputs![now, 0, 1, 2]).unwrap();
    assert_eq!(c.records(), &[CoordinateRecord::new(0.0, 1.0, 2.0).at(iso(now))]);

    let c = Coordinates::decode(&inputs![now, 0, 1, 2, y2k(), 3, 4, 5]).unwrap();
    assert_eq!(
        c.records(),
        &[
            CoordinateRecord::new(0.0, 1.0, 2.0).at(iso(now)),
            CoordinateRecord::new(3.0, 4.0, 5.0).at(iso(y2k())),
        ]
    );
    assert_eq!(
        c.to_json(),
        json!([format_datetime(now), 0.0, 1.0, 2.0, "2000-01-01T00:00:00", 3.0, 4.0, 5.0])
    );

    let c = Coordinates::decode(&inputs![now, 0, 1, 2, 6, 3, 4, 5]).unwrap();
    assert_eq!(c.records()[1].t, Some(TimeOrNumber::Number(6.0)));
}

#[test]
fn points_interleave_with_timestamps() {
    let p = GeoPoint::new(0.0, 1.0);
    let c = Coordinates::decode(&Input::point(&p)).unwrap();
    assert_eq!((c.records()[0].x, c.records()[0].y), (0.0, 1.0));

    let now = now();
    let c = Coordinates::decode(&inputs![now, p.clone()]).unwrap();
    assert_eq!(c.records(), &[CoordinateRecord::new(0.0, 1.0, 0.0).at(iso(now))]);

    let p1 = GeoPoint::xyz(0.0, 1.0, 2.0);
    let c = Coordinates::decode(&inputs![now, p, y2k(), p1]).unwrap();
    assert_eq!(c.records()[0].z, 0.0);
    assert_eq!(c.records()[1].z, 2.0);
    assert_eq!(c.records()[1].t, Some(iso(y2k())));
    assert_eq!(
        c.to_json(),
        json!([format_datetime(now), 0.0, 1.0, 0.0, "2000-01-01T00:00:00", 0.0, 1.0, 2.0])
    );
}

#[test]
fn external_point_types_are_accepted() {
    struct Fix {
        lon: f64,
        lat: f64,
        at: NaiveDateTime,
    }

    impl czml_core::PointLike for Fix {
        fn x(&self) -> f64 {
            self.lon
        }
        fn y(&self) -> f64 {
            self.lat
        }
        fn time(&self) -> Option<Input> {
            Some(Input::from(self.at))
        }
    }

    let fixes = [
        Fix { lon: 1.0, lat: 2.0, at: y2k() },
        Fix { lon: 3.0, lat: 4.0, at: y2k() + chrono::Duration::seconds(30) },
    ];
    let mut pos = Position::default();
    pos.cartographic_degrees
        .set(Input::List(fixes.iter().map(Input::point).collect()))
        .unwrap();
    assert_eq!(
        pos.data(),
        json!({"cartographicDegrees": [
            "2000-01-01T00:00:00", 1.0, 2.0, 0.0,
            "2000-01-01T00:00:30", 3.0, 4.0, 0.0
        ]})
    );
}

#[test]
fn color_variants_round_trip_independently() {
    let mut col = Color::default();
    col.rgba.set(inputs![0, 255, 127]).unwrap();
    assert_eq!(col.rgba.emit(), Some(json!([0, 255, 127, 1])));
    col.rgba.set(inputs![0, 255, 127, 55]).unwrap();
    assert_eq!(col.rgba.emit(), Some(json!([0, 255, 127, 55])));

    let now = now();
    let now_iso = format_datetime(now);
    col.rgba
        .set(inputs![now, 0, 255, 127, 55, "2000-01-01T00:00:00", 5, 6, 7, 8])
        .unwrap();
    assert_eq!(
        col.rgba.emit(),
        Some(json!([now_iso, 0, 255, 127, 55, "2000-01-01T00:00:00", 5, 6, 7, 8]))
    );
    col.rgba.set(inputs![1, 0, 255, 127, 55, 2, 5, 6, 7, 8]).unwrap();
    assert_eq!(
        col.rgba.emit(),
        Some(json!([1.0, 0, 255, 127, 55, 2.0, 5, 6, 7, 8]))
    );

    let rgba_before = col.rgba.clone();
    col.rgbaf
        .set(inputs![now, 0, 0.255, 0.127, 0.55, "2000-01-01T00:00:00", 0.5, 0.6, 0.7, 0.8])
        .unwrap();
    assert_eq!(col.rgba, rgba_before);
    assert_eq!(
        col.rgbaf.emit(),
        Some(json!([now_iso, 0.0, 0.255, 0.127, 0.55, "2000-01-01T00:00:00", 0.5, 0.6, 0.7, 0.8]))
    );

    let mut col2 = Color::default();
    col2.loads(&col.dumps()).unwrap();
    assert_eq!(col.data(), col2.data());
}

#[test]
fn position_emits_and_reloads() {
    let mut pos = Position::default();
    let now = now();
    pos.epoch.set(now).unwrap();
    let coords = vec![7.0, 0.0, 1.0, 2.0, 6.0, 3.0, 4.0, 5.0];
    pos.cartographic_radians.set(coords.clone()).unwrap();
    let js = json!({"epoch": format_datetime(now), "cartographicRadians": coords});
    assert_eq!(pos.data(), js);
    assert_eq!(pos.dumps(), js.to_string());

    pos.cartographic_degrees.set(coords.clone()).unwrap();
    pos.cartesian.set(coords.clone()).unwrap();
    assert_eq!(pos.data()["cartesian"], json!(coords));

    let mut pos2 = Position::default();
    pos2.loads(&pos.dumps()).unwrap();
    assert_eq!(pos.data(), pos2.data());
}

#[test]
fn point_emission_follows_show_default() {
    let mut point = Point::default();
    point.color.set(json!({"rgba": [0, 255, 127, 55]})).unwrap();
    assert_eq!(
        point.data(),
        json!({"color": {"rgba": [0, 255, 127, 55]}, "show": false})
    );
    point
        .outline_color
        .set(json!({"rgbaf": [0.0, 0.255, 0.127, 0.55]}))
        .unwrap();
    point.pixel_size.set(10).unwrap();
    point.outline_width.set(2).unwrap();
    point.show.set(true).unwrap();
    assert_eq!(
        point.data(),
        json!({
            "color": {"rgba": [0, 255, 127, 55]},
            "pixelSize": 10,
            "outlineColor": {"rgbaf": [0.0, 0.255, 0.127, 0.55]},
            "outlineWidth": 2,
            "show": true
        })
    );
    let p2 = Point::parse(point.dumps()).unwrap();
    assert_eq!(point.data(), p2.data());
}

#[test]
fn label_and_billboard_round_trip() {
    let mut l = Label::default();
    l.text.set("test label").unwrap();
    l.show.set(false).unwrap();
    assert_eq!(l.data(), json!({"text": "test label", "show": false}));
    l.show.set(true).unwrap();
    assert_eq!(l.data(), json!({"text": "test label", "show": true}));
    assert_eq!(Label::parse(l.dumps()).unwrap().data(), l.data());

    let mut bb = Billboard::default();
    bb.image.set("http://localhost/img.png").unwrap();
    bb.scale.set(0.7).unwrap();
    bb.show.set(true).unwrap();
    assert_eq!(
        bb.data(),
        json!({"image": "http://localhost/img.png", "scale": 0.7, "show": true})
    );
    assert_eq!(Billboard::parse(bb.dumps()).unwrap().data(), bb.data());
}

fn build_packet() -> CzmlPacket {
    let mut p = CzmlPacket::new("abc");
    assert_eq!(p.dumps(), r#"{"id":"abc"}"#);

    let bb = p.billboard.edit();
    bb.image.set("http://localhost/img.png").unwrap();
    bb.scale.set(0.7).unwrap();
    bb.show.set(true).unwrap();
    assert_eq!(
        p.data(),
        json!({
            "billboard": {"image": "http://localhost/img.png", "scale": 0.7, "show": true},
            "id": "abc"
        })
    );

    let mut pos = Position::default();
    pos.cartesian
        .set(vec![7.0, 0.0, 1.0, 2.0, 6.0, 3.0, 4.0, 5.0])
        .unwrap();
    p.position.assign(pos);
    let mut l = Label::default();
    l.text.set("test label").unwrap();
    l.show.set(false).unwrap();
    p.label.assign(l);
    p
}

#[test]
fn packet_round_trips() {
    let p = build_packet();
    assert_eq!(
        p.data(),
        json!({
            "billboard": {"image": "http://localhost/img.png", "scale": 0.7, "show": true},
            "id": "abc",
            "label": {"show": false, "text": "test label"},
            "position": {"cartesian": [7.0, 0.0, 1.0, 2.0, 6.0, 3.0, 4.0, 5.0]}
        })
    );
    let mut p2 = CzmlPacket::new("abc");
    p2.loads(&p.dumps()).unwrap();
    assert_eq!(p.data(), p2.data());
}

#[test]
fn document_keeps_packet_order() {
    let mut cz = Czml::new();
    assert_eq!(cz.data(), json!([]));
    cz.push(build_packet());
    cz.push(CzmlPacket::new("cde"));
    cz.push(CzmlPacket::new("abc"));
    let ids: Vec<_> = cz
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("abc"), json!("cde"), json!("abc")]);

    let mut cz1 = Czml::new();
    cz1.loads(&cz.dumps()).unwrap();
    assert_eq!(cz.data(), cz1.data());
    assert_eq!(cz, cz1);
}

#[test]
fn rejected_assignments_keep_previous_state() {
    let mut pos = Position::default();
    pos.cartesian.set(inputs![1, 2, 3]).unwrap();
    let before = pos.data();

    assert!(matches!(
        pos.cartesian.set(inputs![1, 2, 3, 4, 5]),
        Err(CzmlError::MalformedSequence { len: 5, .. })
    ));
    assert!(matches!(
        pos.reference_frame.set(inputs!["FIXED"]),
        Err(CzmlError::TypeMismatch { found: "list", .. })
    ));
    assert!(matches!(
        pos.epoch.set(true),
        Err(CzmlError::TypeMismatch { found: "bool", .. })
    ));
    assert!(matches!(
        pos.cartesian.set(inputs![0.0, f64::NAN, 1.0]),
        Err(CzmlError::TypeMismatch { .. })
    ));
    assert!(matches!(
        pos.cartographic_degrees
            .set(inputs!["2000-01-01", 0, 1, "2000-01-02", 3, 4, 5]),
        Err(CzmlError::MalformedSequence { len: 7, .. })
    ));
    assert_eq!(pos.data(), before);
    assert!(Position::parse(pos.dumps()).is_ok());

    let mut col = Color::default();
    col.rgba.set(inputs![1, 2, 3, 4]).unwrap();
    assert!(col.rgba.set(inputs![1, 2, 3, 400]).is_err());
    assert_eq!(col.rgba.emit(), Some(json!([1, 2, 3, 4])));
}
