use chrono::NaiveDate;

use forcing_harness::{build_log_items, reconstruct, HarnessError};

/// Builds synthetic model logs line by line.
#[derive(Default)]
struct LogBuilder {
    lines: Vec<String>,
}

impl LogBuilder {
    fn clock_pair(&mut self, datetime: &str) -> &mut Self {
        self.lines
            .push(format!("{{'cur_exp-datetime': '{datetime}'}}"));
        self.lines
            .push(format!("{{'cur_forcing-datetime': '{datetime}'}}"));
        self
    }

    fn update(
        &mut self,
        datetime: &str,
        file: &str,
        index: i64,
        field: &str,
        step: &str,
        value: f64,
    ) -> &mut Self {
        self.lines
            .push(format!("{{'forcing_update_field-datetime': '{datetime}'}}"));
        self.lines
            .push(format!("{{'field_update_data-file': '{file}'}}"));
        self.lines
            .push(format!("{{'field_update_data-index': {index}}}"));
        self.checksum(field, step, value)
    }

    fn checksum(&mut self, field: &str, step: &str, value: f64) -> &mut Self {
        self.lines
            .push(format!("{{'checksum-matmxx-{field}-{step}': {value}}}"));
        self
    }

    fn raw(&mut self, line: &str) -> &mut Self {
        self.lines.push(line.to_string());
        self
    }

    fn build(&self) -> String {
        let mut log = self.lines.join("\n");
        log.push('\n');
        log
    }
}

/// Two fields over two timestamps, with the runoff checksum emitted three
/// times (identical value) in the first cycle.
fn two_field_log() -> String {
    let mut builder = LogBuilder::default();
    builder
        .clock_pair("1958-01-01T00:00:00")
        .update(
            "1958-01-01T00:00:00",
            "rsds_1958.nc",
            1,
            "swfld_ai",
            "0000000000",
            100.5,
        )
        .update(
            "1958-01-01T00:00:00",
            "friver_1958.nc",
            1,
            "runof_ai",
            "0000000000",
            7.5,
        )
        .checksum("runof_ai", "0000003600", 7.5)
        .checksum("runof_ai", "0000007200", 7.5)
        .clock_pair("1958-01-01T03:00:00")
        .update(
            "1958-01-01T03:00:00",
            "rsds_1958.nc",
            2,
            "swfld_ai",
            "0000010800",
            200.5,
        )
        .update(
            "1958-01-01T03:00:00",
            "friver_1958.nc",
            2,
            "runof_ai",
            "0000010800",
            8.5,
        );
    builder.build()
}

#[test]
fn reconstructs_items_after_runoff_dedup() {
    let reconstruction = reconstruct(&two_field_log()).unwrap();

    assert_eq!(reconstruction.removed_runoff_duplicates, 2);
    assert_eq!(reconstruction.items.len(), 4);
    assert_eq!(reconstruction.sync.expected, 2);
    assert_eq!(reconstruction.sync.experiment, 2);
    assert_eq!(reconstruction.sync.forcing, 2);

    let field_names: Vec<&str> = reconstruction
        .items
        .iter()
        .map(|item| item.field_name.as_str())
        .collect();
    assert_eq!(field_names, vec!["swfld_ai", "runof_ai", "swfld_ai", "runof_ai"]);

    let first = &reconstruction.items[0];
    assert_eq!(
        first.forcing_datetime,
        NaiveDate::from_ymd_opt(1958, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
    assert_eq!(first.field_file, "rsds_1958.nc");
    assert_eq!(first.field_index, 1);
    assert_eq!(first.checksum.value, 100.5);

    let last = &reconstruction.items[3];
    assert_eq!(last.checksum.key.field, "runof_ai");
    assert_eq!(last.checksum.value, 8.5);
    assert_eq!(
        last.forcing_datetime,
        NaiveDate::from_ymd_opt(1958, 1, 1)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap()
    );
}

#[test]
fn build_log_items_returns_the_ordered_items() {
    let items = build_log_items(&two_field_log()).unwrap();
    assert_eq!(items.len(), 4);
    assert!(items.windows(2).all(|pair| {
        pair[0].forcing_datetime <= pair[1].forcing_datetime
    }));
}

#[test]
fn parallel_length_mismatch_fails_fast() {
    let mut builder = LogBuilder::default();
    builder
        .clock_pair("1958-01-01T00:00:00")
        .update(
            "1958-01-01T00:00:00",
            "rsds_1958.nc",
            1,
            "swfld_ai",
            "0000000000",
            100.5,
        )
        // A checksum with no matching update lines, and not a runoff value
        // that dedup could absorb.
        .checksum("lwfld_ai", "0000000000", 55.0);

    let err = reconstruct(&builder.build()).unwrap_err();
    assert!(matches!(err, HarnessError::Consistency(_)), "got {err:?}");
}

#[test]
fn fractional_exchange_ratio_is_rejected() {
    // Three updates across two distinct fields: 3 / 2 is not integral.
    let mut builder = LogBuilder::default();
    builder
        .clock_pair("1958-01-01T00:00:00")
        .update(
            "1958-01-01T00:00:00",
            "rsds_1958.nc",
            1,
            "swfld_ai",
            "0000000000",
            100.5,
        )
        .update(
            "1958-01-01T00:00:00",
            "friver_1958.nc",
            1,
            "runof_ai",
            "0000000000",
            7.5,
        )
        .update(
            "1958-01-01T03:00:00",
            "rsds_1958.nc",
            2,
            "swfld_ai",
            "0000010800",
            200.5,
        );

    let err = reconstruct(&builder.build()).unwrap_err();
    assert!(matches!(err, HarnessError::Consistency(_)), "got {err:?}");
}

#[test]
fn missing_clock_pair_is_rejected() {
    // Four updates over two fields expect two clock pairs; only one present.
    let log = two_field_log().replace(
        "{'cur_exp-datetime': '1958-01-01T03:00:00'}\n{'cur_forcing-datetime': '1958-01-01T03:00:00'}\n",
        "",
    );
    let err = reconstruct(&log).unwrap_err();
    assert!(matches!(err, HarnessError::Consistency(_)), "got {err:?}");
}

#[test]
fn malformed_selected_line_is_a_parse_error() {
    let mut builder = LogBuilder::default();
    builder.raw("{'checksum-matmxx-swfld_ai-0000000000' oops}");
    let err = build_log_items(&builder.build()).unwrap_err();
    assert!(matches!(err, HarnessError::RecordSyntax { .. }), "got {err:?}");
}
