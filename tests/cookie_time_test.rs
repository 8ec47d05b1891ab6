//! Cookie date parsing against the formats servers actually send.

use cookiemonster::cookies::cookie_time::parse_cookie_time;
use time::macros::datetime;
use time::OffsetDateTime;

const APR_15_2017: OffsetDateTime = datetime!(2017-04-15 21:01:22 UTC);
const APR_18_2007: OffsetDateTime = datetime!(2007-04-18 22:50:12 UTC);
const JAN_1_2003: OffsetDateTime = datetime!(2003-01-01 00:00:00 UTC);

#[test]
fn test_accepted_dates() {
    let cases: &[(&str, OffsetDateTime)] = &[
        ("Sat, 15-Apr-17 21:01:22 GMT", APR_15_2017),
        ("Thu, 19-Apr-2007 16:00:00 GMT", datetime!(2007-04-19 16:00:00 UTC)),
        ("Wed, 25 Apr 2007 21:02:13 GMT", datetime!(2007-04-25 21:02:13 UTC)),
        ("Thu, 19/Apr\\2007 16:00:00 GMT", datetime!(2007-04-19 16:00:00 UTC)),
        ("Fri, 1 Jan 2010 01:01:50 GMT", datetime!(2010-01-01 01:01:50 UTC)),
        ("Wednesday, 1-Jan-2003 00:00:00 GMT", JAN_1_2003),
        (", 1-Jan-2003 00:00:00 GMT", JAN_1_2003),
        (" 1-Jan-2003 00:00:00 GMT", JAN_1_2003),
        ("1-Jan-2003 00:00:00 GMT", JAN_1_2003),
        ("Wed,18-Apr-07 22:50:12 GMT", APR_18_2007),
        ("WillyWonka  , 18-Apr-07 22:50:12 GMT", APR_18_2007),
        ("WillyWonka  , 18-Apr-07 22:50:12", APR_18_2007),
        ("WillyWonka  ,  18-apr-07   22:50:12", APR_18_2007),
        ("Mon, 18-Apr-1977 22:50:13 GMT", datetime!(1977-04-18 22:50:13 UTC)),
        ("Mon, 18-Apr-77 22:50:13 GMT", datetime!(1977-04-18 22:50:13 UTC)),
        ("\"Sat, 15-Apr-17\\\"21:01:22\\\"GMT\"", APR_15_2017),
        ("Partyday, 18- April-07 22:50:12", APR_18_2007),
        ("Partyday, 18 - Apri-07 22:50:12", APR_18_2007),
        ("Wednes, 1-Januar-2003 00:00:00 GMT", JAN_1_2003),
        ("Sat, 15-Apr-2017 21:01:22", APR_15_2017),
        ("Sat, 15-Apr-2017 21:01:22 GMT-2", APR_15_2017),
        ("Sat, 15-Apr-2017 21:01:22 GMT BLAH", APR_15_2017),
        ("Sat, 15-Apr-2017 21:01:22 GMT-0400", APR_15_2017),
        ("Sat, 15-Apr-2017 21:01:22 GMT-0400 (EDT)", APR_15_2017),
        ("Sat, 15-Apr-2017 21:01:22 DST", APR_15_2017),
        ("Sat, 15-Apr-2017 21:01:22 -0400", APR_15_2017),
        ("Sat, 15-Apr-2017 21:01:22 (hello there)", APR_15_2017),
        ("Sat, 15-Apr-2017 21:01:22 11:22:33", APR_15_2017),
        ("Sat, 15-Apr-2017 ::00 21:01:22", APR_15_2017),
        ("Sat, 15-Apr-2017 boink:z 21:01:22", APR_15_2017),
        ("Thu Apr 18 22:50:12 2007 GMT", APR_18_2007),
        ("22:50:12 Thu Apr 18 2007 GMT", APR_18_2007),
        ("Thu 22:50:12 Apr 18 2007 GMT", APR_18_2007),
        ("Thu Apr 22:50:12 18 2007 GMT", APR_18_2007),
        ("Thu Apr 18 2007 22:50:12 GMT", APR_18_2007),
        ("Thu Apr 18 2007 GMT 22:50:12", APR_18_2007),
        ("15-Sat, Apr-17 21:01:22 GMT", APR_15_2017),
        ("15-Sat, Apr 21:01:22 GMT 17", APR_15_2017),
        ("15-Sat, Apr 21:01:22 GMT 2017", APR_15_2017),
        ("15 Apr 21:01:22 2017", APR_15_2017),
        ("15 17 Apr 21:01:22", APR_15_2017),
        ("Apr 15 17 21:01:22", APR_15_2017),
        ("Apr 15 21:01:22 17", APR_15_2017),
    ];

    for (input, expected) in cases {
        assert_eq!(parse_cookie_time(input), Some(*expected), "input: {input:?}");
    }
}

#[test]
fn test_rejected_dates() {
    let cases = [
        "Sat, 15-Apr-2017 91:22:33 21:01:22",
        "98 April 17 21:01:22",
        "Thu, 012-Aug-2008 20:49:07 GMT",
        "Thu, 12-Aug-31841 20:49:07 GMT",
        "Thu, 12-Aug-9999999999 20:49:07 GMT",
        "Thu, 999999999999-Aug-2007 20:49:07 GMT",
        "Thu, 12-Aug-2007 20:61:99999999999 GMT",
        "Thu, 31-Feb-2007 20:49:07 GMT",
        "Thu, 12-Aug-1600 20:49:07 GMT",
        "IAintNoDateFool",
        "",
    ];

    for input in cases {
        assert_eq!(parse_cookie_time(input), None, "input: {input:?}");
    }
}
