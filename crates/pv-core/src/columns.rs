//! PEtab column names.

pub const OBSERVABLE_ID: &str = "observableId";
pub const OBSERVABLE_NAME: &str = "observableName";
pub const OBSERVABLE_FORMULA: &str = "observableFormula";
pub const OBSERVABLE_TRANSFORMATION: &str = "observableTransformation";
pub const NOISE_FORMULA: &str = "noiseFormula";
pub const NOISE_DISTRIBUTION: &str = "noiseDistribution";

pub const PREEQUILIBRATION_CONDITION_ID: &str = "preequilibrationConditionId";
pub const SIMULATION_CONDITION_ID: &str = "simulationConditionId";
pub const MEASUREMENT: &str = "measurement";
pub const SIMULATION: &str = "simulation";
pub const TIME: &str = "time";
pub const OBSERVABLE_PARAMETERS: &str = "observableParameters";
pub const NOISE_PARAMETERS: &str = "noiseParameters";
pub const DATASET_ID: &str = "datasetId";
pub const REPLICATE_ID: &str = "replicateId";

pub const CONDITION_ID: &str = "conditionId";
pub const CONDITION_NAME: &str = "conditionName";

pub const PLOT_ID: &str = "plotId";
pub const PLOT_NAME: &str = "plotName";
pub const PLOT_TYPE_SIMULATION: &str = "plotTypeSimulation";
pub const PLOT_TYPE_DATA: &str = "plotTypeData";
pub const X_VALUES: &str = "xValues";
pub const X_OFFSET: &str = "xOffset";
pub const X_LABEL: &str = "xLabel";
pub const X_SCALE: &str = "xScale";
pub const Y_VALUES: &str = "yValues";
pub const Y_OFFSET: &str = "yOffset";
pub const Y_LABEL: &str = "yLabel";
pub const Y_SCALE: &str = "yScale";
pub const LEGEND_ENTRY: &str = "legendEntry";
