// ═══════════════════════════════════════════════════════════════════
// Normalizer Tests — date resolution, amount separators, rejection
// ═══════════════════════════════════════════════════════════════════

use chrono::{NaiveDate, NaiveDateTime};

use finance_charts_core::models::record::{NormalizedRecord, RawRecord, RawValue};
use finance_charts_core::models::settings::AmountConvention;
use finance_charts_core::services::record_normalizer::{
    parse_amount_text, parse_date, RecordNormalizer,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
    at(y, m, d, 0, 0)
}

fn text_date(s: &str) -> Option<NaiveDateTime> {
    parse_date(&RawValue::Text(s.to_string()))
}

fn amount(s: &str) -> Option<f64> {
    parse_amount_text(s, AmountConvention::LastSeparatorDecimal)
}

// ── Dates ───────────────────────────────────────────────────────────

mod dates {
    use super::*;

    #[test]
    fn iso_date_is_taken_literally() {
        assert_eq!(text_date("2024-03-05"), Some(midnight(2024, 3, 5)));
    }

    #[test]
    fn iso_date_without_zero_padding() {
        assert_eq!(text_date("2024-3-5"), Some(midnight(2024, 3, 5)));
    }

    #[test]
    fn day_first_with_slashes() {
        assert_eq!(text_date("05/03/2024"), Some(midnight(2024, 3, 5)));
    }

    #[test]
    fn day_first_with_dashes() {
        assert_eq!(text_date("05-03-2024"), Some(midnight(2024, 3, 5)));
    }

    #[test]
    fn day_first_mixed_separators_rejected() {
        assert_eq!(text_date("05-03/2024"), None);
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(text_date("  2024-03-05 "), Some(midnight(2024, 3, 5)));
    }

    #[test]
    fn impossible_dates_rejected() {
        assert_eq!(text_date("2024-02-30"), None);
        assert_eq!(text_date("31/04/2024"), None);
        assert_eq!(text_date("2024-13-01"), None);
    }

    #[test]
    fn leap_day_accepted() {
        assert_eq!(text_date("29/02/2024"), Some(midnight(2024, 2, 29)));
    }

    #[test]
    fn rfc3339_keeps_written_wall_clock() {
        assert_eq!(text_date("2024-03-05T10:30:00Z"), Some(at(2024, 3, 5, 10, 30)));
        assert_eq!(
            text_date("2024-03-05T23:30:00-05:00"),
            Some(at(2024, 3, 5, 23, 30))
        );
    }

    #[test]
    fn naive_date_times() {
        assert_eq!(text_date("2024-03-05T08:15:00"), Some(at(2024, 3, 5, 8, 15)));
        assert_eq!(text_date("2024-03-05 08:15:00"), Some(at(2024, 3, 5, 8, 15)));
        assert_eq!(text_date("2024-03-05T08:15"), Some(at(2024, 3, 5, 8, 15)));
    }

    #[test]
    fn other_common_layouts() {
        assert_eq!(text_date("2024/03/05"), Some(midnight(2024, 3, 5)));
        assert_eq!(text_date("05.03.2024"), Some(midnight(2024, 3, 5)));
        assert_eq!(text_date("Mar 05, 2024"), Some(midnight(2024, 3, 5)));
        assert_eq!(text_date("March 5, 2024"), Some(midnight(2024, 3, 5)));
    }

    #[test]
    fn epoch_millis_in_utc() {
        let v = RawValue::Number(1_704_067_200_000.0);
        assert_eq!(parse_date(&v), Some(midnight(2024, 1, 1)));
    }

    #[test]
    fn fractional_epoch_millis_truncated() {
        let v = RawValue::Number(1_704_067_200_000.9);
        assert_eq!(parse_date(&v), Some(midnight(2024, 1, 1)));
    }

    #[test]
    fn native_value_used_as_is() {
        let v = RawValue::DateTime(at(2023, 7, 14, 9, 45));
        assert_eq!(parse_date(&v), Some(at(2023, 7, 14, 9, 45)));
    }

    #[test]
    fn years_beyond_four_digits_rejected() {
        // Microseconds mistaken for milliseconds land after year 9999.
        assert_eq!(parse_date(&RawValue::Number(253_402_300_800_000.0)), None);
        assert_eq!(
            parse_date(&RawValue::Number(253_402_214_400_000.0)),
            Some(midnight(9999, 12, 31))
        );
        assert_eq!(parse_date(&RawValue::DateTime(midnight(10000, 1, 1))), None);
        assert_eq!(parse_date(&RawValue::DateTime(midnight(-1, 6, 1))), None);
        assert_eq!(
            parse_date(&RawValue::DateTime(midnight(0, 6, 1))),
            Some(midnight(0, 6, 1))
        );
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(text_date("not a date"), None);
        assert_eq!(text_date(""), None);
        assert_eq!(parse_date(&RawValue::Bool(true)), None);
        assert_eq!(parse_date(&RawValue::Null), None);
        assert_eq!(parse_date(&RawValue::Number(f64::NAN)), None);
        assert_eq!(parse_date(&RawValue::Number(f64::INFINITY)), None);
    }
}

// ── Amounts ─────────────────────────────────────────────────────────

mod amounts {
    use super::*;

    #[test]
    fn both_separator_conventions_agree() {
        assert_eq!(amount("1.234,56"), Some(1234.56));
        assert_eq!(amount("1,234.56"), Some(1234.56));
    }

    #[test]
    fn currency_symbols_and_spaces_stripped() {
        assert_eq!(amount("€ 1.234,56"), Some(1234.56));
        assert_eq!(amount("$1,234.56 USD"), Some(1234.56));
        assert_eq!(amount("R$ 10,00"), Some(10.0));
    }

    #[test]
    fn leading_minus_kept() {
        assert_eq!(amount("-1.234,56"), Some(-1234.56));
        assert_eq!(amount("€ -12,50"), Some(-12.5));
    }

    #[test]
    fn inner_minus_rejected() {
        assert_eq!(amount("12-5"), None);
        assert_eq!(amount("--5"), None);
    }

    #[test]
    fn lone_comma_with_short_fraction_is_decimal() {
        assert_eq!(amount("12,5"), Some(12.5));
        assert_eq!(amount("1234,56"), Some(1234.56));
    }

    #[test]
    fn commas_grouping_thousands_are_dropped() {
        assert_eq!(amount("1,234"), Some(1234.0));
        assert_eq!(amount("1,234,567"), Some(1_234_567.0));
    }

    #[test]
    fn dots_only() {
        assert_eq!(amount("1.5"), Some(1.5));
        assert_eq!(amount("1.234.567"), Some(1_234_567.0));
    }

    #[test]
    fn repeated_decimal_separator_rejected() {
        assert_eq!(amount("1,234.5.6"), None);
    }

    #[test]
    fn no_digits_rejected() {
        assert_eq!(amount(""), None);
        assert_eq!(amount("abc"), None);
        assert_eq!(amount("-"), None);
        assert_eq!(amount(",."), None);
    }

    #[test]
    fn drop_commas_convention() {
        let rule = AmountConvention::DropCommas;
        assert_eq!(parse_amount_text("1,234.56", rule), Some(1234.56));
        assert_eq!(parse_amount_text("12,50", rule), Some(1250.0));
        assert_eq!(parse_amount_text("1.234,56", rule), Some(1.23456));
    }

    #[test]
    fn numbers_pass_through() {
        let n = RecordNormalizer::default();
        assert_eq!(n.parse_amount(&RawValue::Number(-40.0)), Some(-40.0));
        assert_eq!(n.parse_amount(&RawValue::Number(f64::NAN)), None);
        assert_eq!(n.parse_amount(&RawValue::Number(f64::NEG_INFINITY)), None);
        assert_eq!(n.parse_amount(&RawValue::Bool(true)), None);
        assert_eq!(n.parse_amount(&RawValue::Null), None);
    }
}

// ── Whole records ───────────────────────────────────────────────────

mod records {
    use super::*;

    #[test]
    fn accepts_simple_record() {
        let n = RecordNormalizer::default();
        let rec = n.normalize(&RawRecord::dated("2024-01-03", -40.0)).unwrap();
        assert_eq!(rec, NormalizedRecord::new(midnight(2024, 1, 3), -40.0));
    }

    #[test]
    fn uses_field_aliases() {
        let n = RecordNormalizer::default();
        let raw = RawRecord::new()
            .with("createdAt", "2024-01-03")
            .with("value", "12,50");
        assert_eq!(
            n.normalize(&raw),
            Some(NormalizedRecord::new(midnight(2024, 1, 3), 12.5))
        );
    }

    #[test]
    fn rejects_missing_amount() {
        let n = RecordNormalizer::default();
        let raw = RawRecord::new().with("date", "2024-01-03");
        assert_eq!(n.normalize(&raw), None);
    }

    #[test]
    fn rejects_missing_or_bad_date() {
        let n = RecordNormalizer::default();
        assert_eq!(n.normalize(&RawRecord::new().with("amount", 10.0)), None);
        assert_eq!(n.normalize(&RawRecord::dated("someday", 10.0)), None);
    }

    #[test]
    fn batch_drops_rejects_and_keeps_order() {
        let n = RecordNormalizer::default();
        let raws = vec![
            RawRecord::dated("2024-01-05", 1.0),
            RawRecord::dated("garbage", 2.0),
            RawRecord::dated("2024-01-01", "oops"),
            RawRecord::dated("2024-01-02", 3.0),
        ];
        let out = n.normalize_batch(&raws);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].amount, 1.0);
        assert_eq!(out[1].amount, 3.0);
    }

    #[test]
    fn normalization_is_idempotent() {
        let n = RecordNormalizer::default();
        let raws = vec![
            RawRecord::dated("2024-03-05", "1.234,56"),
            RawRecord::dated("05/03/2024", -40.0),
            RawRecord::dated(1_704_067_200_000_i64, "-0,99"),
            RawRecord::dated("2024-03-05T10:30:00Z", 0.0),
        ];
        for raw in &raws {
            let once = n.normalize(raw).unwrap();
            let twice = n.normalize(&RawRecord::from(once)).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn decodes_from_json_batch() {
        let raws: Vec<RawRecord> = serde_json::from_str(
            r#"[
                {"date": "2024-01-01", "amount": 100},
                {"createdAt": 1704240000000, "amount": "-40,00"},
                {"date": {"nested": true}, "amount": 5}
            ]"#,
        )
        .unwrap();
        let out = RecordNormalizer::default().normalize_batch(&raws);
        assert_eq!(
            out,
            vec![
                NormalizedRecord::new(midnight(2024, 1, 1), 100.0),
                NormalizedRecord::new(midnight(2024, 1, 3), -40.0),
            ]
        );
    }

    #[test]
    fn convention_is_configurable() {
        let raw = RawRecord::dated("2024-01-01", "12,50");
        let last = RecordNormalizer::new(AmountConvention::LastSeparatorDecimal);
        let drop = RecordNormalizer::new(AmountConvention::DropCommas);
        assert_eq!(last.normalize(&raw).unwrap().amount, 12.5);
        assert_eq!(drop.normalize(&raw).unwrap().amount, 1250.0);
        assert_eq!(drop.convention(), AmountConvention::DropCommas);
    }
}
