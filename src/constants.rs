/// Constants naming the record keys the simulation writes to its log.
pub mod record_keys {
    /// Datetime at which a forcing field update was applied.
    pub const FORCING_UPDATE_DATETIME: &str = "forcing_update_field-datetime";
    /// Data file a field update was read from.
    pub const FIELD_UPDATE_FILE: &str = "field_update_data-file";
    /// Record index of a field update within its data file.
    pub const FIELD_UPDATE_INDEX: &str = "field_update_data-index";
    /// Experiment clock datetime, written once per full field-exchange cycle.
    pub const CUR_EXP_DATETIME: &str = "cur_exp-datetime";
    /// Forcing clock datetime, written once per full field-exchange cycle.
    pub const CUR_FORCING_DATETIME: &str = "cur_forcing-datetime";
    /// Leading segment of every checksum record key.
    pub const CHECKSUM_PREFIX: &str = "checksum";
}

/// Constants describing forcing field categories.
pub mod fields {
    /// Marker identifying the runoff field, which the model exchanges
    /// redundantly and whose repeated checksums must be deduplicated.
    pub const RUNOFF_MARKER: &str = "runof_ai";
}

/// Names of the stock experiment presets.
pub mod experiments {
    /// Interannual forcing preset.
    pub const JRA55_IAF: &str = "JRA55_IAF";
    /// Repeat-year forcing preset.
    pub const JRA55_RYF: &str = "JRA55_RYF";
    /// Repeat-year forcing preset with a reduced field set.
    pub const JRA55_RYF_MINIMAL: &str = "JRA55_RYF_MINIMAL";
    /// Single-field interannual preset, cheap enough for multi-year runs.
    pub const JRA55_IAF_SINGLE_FIELD: &str = "JRA55_IAF_SINGLE_FIELD";
    /// Preset whose shortwave field is scaled by the update number.
    pub const FORCING_SCALING: &str = "FORCING_SCALING";
    /// Presets exercised when no experiment is named.
    pub const DEFAULT_SWEEP: &[&str] = &[JRA55_IAF, JRA55_RYF, JRA55_RYF_MINIMAL];
}

/// Constants for the on-disk experiment layout.
pub mod files {
    /// Default root directory holding one subdirectory per experiment.
    pub const DEFAULT_TEST_ROOT: &str = "test_data";
    /// Default simulation executable name.
    pub const DEFAULT_EXECUTABLE: &str = "atm.exe";
    /// Namelist file carrying the forcing start/end dates.
    pub const ACCESSOM2_NAMELIST: &str = "accessom2.nml";
    /// Forcing-description file listing the configured input fields.
    pub const FORCING_CONFIG: &str = "forcing.json";
    /// Stored known-good checksum file.
    pub const CHECKSUM_REFERENCE: &str = "checksums.json";
    /// Primary model log file produced by a run.
    pub const PRIMARY_LOG: &str = "atm.log";
    /// Secondary coupling log file produced by a run.
    pub const SECONDARY_LOG: &str = "matm.log";
}

/// Constants for the namelist keys the harness reads.
pub mod namelist_keys {
    /// Namelist group holding the experiment date configuration.
    pub const DATE_MANAGER_GROUP: &str = "date_manager_nml";
    /// Key holding the forcing period start datetime.
    pub const FORCING_START_DATE: &str = "forcing_start_date";
    /// Key holding the forcing period end datetime.
    pub const FORCING_END_DATE: &str = "forcing_end_date";
}

/// Constants for validation expectations.
pub mod validation {
    /// Expected spacing, in hours, between consecutive unique forcing updates.
    pub const FORCING_TIMESTEP_HOURS: i64 = 3;
    /// Absolute tolerance for the forcing-scaling comparison.
    pub const SCALING_TOLERANCE: f64 = 0.1;
    /// Checksum keys compared by the scaling check, in multiplier order.
    // TODO: derive these from the forcing timestep instead of hard-coding.
    pub const SCALING_KEYS: &[&str] = &[
        "checksum-matmxx-swfld_ai-0000043200",
        "checksum-matmxx-swfld_ai-0000054000",
        "checksum-matmxx-swfld_ai-0000064800",
        "checksum-matmxx-swfld_ai-0000075600",
    ];
}
