/// Experiment preset name (directory name under the test root).
/// Examples: `JRA55_IAF`, `JRA55_RYF`, `FORCING_SCALING`
pub type ExperimentName = String;
/// Forcing field name as exchanged by the coupler.
/// Examples: `swfld_ai`, `runof_ai`
pub type FieldName = String;
/// Data file a forcing field was read from.
/// Example: `rsds_1958.nc`
pub type FieldFile = String;
/// Full serialized checksum record key.
/// Example: `checksum-matmxx-swfld_ai-0000043200`
pub type ChecksumKeyText = String;
