//! Built-in alarm catalog, derived from the AHU sequence of operations (SOO).
//!
//! Covers heating/cooling safeties, economizer, filters, fans, pumps,
//! valves, dampers and CO2/humidity alarms. Keywords are kept exactly as
//! written by the controls engineers, including the few that carry a
//! degree sign, a quote or a hyphen.

use crate::knowledge_base::{AlarmCategory, Severity};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The built-in categories, in matching priority order
pub fn default_categories() -> Vec<AlarmCategory> {
    vec![
        AlarmCategory {
            id: "mixed_air_low_limit_trip".to_string(),
            keywords: strings(&[
                "low limit",
                "freeze",
                "mixed air",
                "38 degrees",
                "38°",
                "low limit thermostat",
            ]),
            reasons: strings(&[
                "Mixed air temperature dropped below low limit (freeze risk).",
                "Outside air damper stuck open during low outdoor temperature or incorrect blending.",
                "Faulty mixed air temperature sensor or miscalibrated sensor.",
                "Heating valve not opening / hot water not circulating.",
                "Airflow too low causing heat exchange imbalance.",
            ]),
            actions: strings(&[
                "Verify mixed air temperature sensor reading and wiring.",
                "Confirm outside air damper position (should close) and check actuator.",
                "Check heating water valve position and hot water supply/return temperatures.",
                "Confirm supply fan is running and airflow setpoints.",
                "If low-limit tripped >3x auto-reset, lock out and alert operator as per SOO.",
            ]),
            severity: Severity::Critical,
        },
        AlarmCategory {
            id: "discharge_air_high_static_or_high_temp".to_string(),
            keywords: strings(&[
                "discharge static",
                "high static",
                "high limit",
                "5 inches",
                "5\" w.c.",
                "static pressure high",
            ]),
            reasons: strings(&[
                "Blockage or dirty filter, coil, or duct causing high static.",
                "Fan speed or VFD malfunction / wrong command causing overpressure.",
                "Damper(s) closed in downstream branch creating overpressure.",
                "Faulty pressure sensor reading or wiring.",
            ]),
            actions: strings(&[
                "Check filter differential pressure and filter banks (replace if required).",
                "Inspect downstream dampers and grilles for closure or obstruction.",
                "Verify fan VFD command vs actual speed and check fan proving status.",
                "Check static pressure transducer for correct reading and calibration.",
            ]),
            severity: Severity::Critical,
        },
        AlarmCategory {
            id: "filter_differential_high".to_string(),
            keywords: strings(&[
                "filter",
                "differential",
                "dp high",
                "pressure drop",
                "pre-filter",
                "primary filter",
            ]),
            reasons: strings(&[
                "Pre-filter or primary filter is loaded or blocked.",
                "Bypass or leak may be mis-reporting DP sensor (sensor fault).",
                "Incorrect sensor span or wiring issue.",
            ]),
            actions: strings(&[
                "Inspect pre-filter and primary filter banks; change filters if DP above setpoint.",
                "Confirm DP sensor wiring and calibration.",
                "Reset alarm after maintenance through BAS graphics.",
            ]),
            severity: Severity::Warning,
        },
        AlarmCategory {
            id: "fan_failure".to_string(),
            keywords: strings(&[
                "fan fail",
                "fan proving",
                "no fan",
                "fan status",
                "motor alarm",
                "vfd trip",
            ]),
            reasons: strings(&[
                "Supply fan is not running (motor or VFD failure).",
                "Fan proving switch or sensor failure/fault.",
                "Electrical supply loss or motor overload trip.",
            ]),
            actions: strings(&[
                "Check fan proving device status and wiring.",
                "Inspect VFD faults and motor starter; check electrical supply.",
                "Examine fan mechanical components (belt, bearings) for seizure.",
            ]),
            severity: Severity::Critical,
        },
        AlarmCategory {
            id: "valve_position_alarm".to_string(),
            keywords: strings(&[
                "valve",
                "stuck",
                "position",
                "control valve",
                "heating valve",
                "chilled water valve",
            ]),
            reasons: strings(&[
                "Actuator failure or lost feedback (valve stuck).",
                "Control signal not reaching actuator or wrong control direction.",
                "Hydronic pump not running causing valve to be ineffective.",
            ]),
            actions: strings(&[
                "Check valve actuator health and position feedback in BAS.",
                "Verify control signal (0-10V / 4-20mA or BACnet command) and wiring.",
                "Confirm associated pump is running and check flow/temperatures.",
            ]),
            severity: Severity::Warning,
        },
        AlarmCategory {
            id: "pump_failure".to_string(),
            keywords: strings(&[
                "pump fail",
                "pump loss",
                "pump alarm",
                "no pump",
                "pump trip",
                "current transducer",
            ]),
            reasons: strings(&[
                "Pump motor failure or electrical supply lost.",
                "Pump tripped on overload or dry-run protection.",
                "Broken belt / coupling or mechanical seizure.",
            ]),
            actions: strings(&[
                "Check current transducer reading and pump run status.",
                "Inspect electrical supply, motor starter, and overloads.",
                "Verify pump priming and piping; confirm flow.",
            ]),
            severity: Severity::Critical,
        },
        AlarmCategory {
            id: "economizer_lockout_or_enthalpy".to_string(),
            keywords: strings(&[
                "economizer",
                "enthalpy",
                "outside air",
                "mixing damper",
                "free cooling",
                "economizer lockout",
            ]),
            reasons: strings(&[
                "Enthalpy control indicates outside air cannot be used (OA enthalpy above return).",
                "Damper actuator stuck or min/max positions not available.",
                "Enthalpy sensor or temperature/humidity sensor mismatch.",
            ]),
            actions: strings(&[
                "Check outside air temperature/humidity sensors and enthalpy calculation.",
                "Inspect economizer damper positions and actuators.",
                "If economizer should be available, verify BAS permit logic and lockouts.",
            ]),
            severity: Severity::Warning,
        },
        AlarmCategory {
            id: "co2_high".to_string(),
            keywords: strings(&[
                "co2",
                "ppm",
                "carbon dioxide",
                "1000",
                "ppm",
            ]),
            reasons: strings(&[
                "Space occupancy has increased beyond ventilation design.",
                "Outside air minimum or demand-control ventilation not functioning.",
                "CO2 sensor miscalibrated or drifted.",
            ]),
            actions: strings(&[
                "Verify space CO2 sensor reading and calibration.",
                "Check outside air damper minimum position and CO2 demand control loop.",
                "Recommend increasing outside air or checking space occupancy.",
            ]),
            severity: Severity::Warning,
        },
        AlarmCategory {
            id: "humidity_high".to_string(),
            keywords: strings(&[
                "humidity",
                "rh",
                "%",
                "dehumidif",
                "60 percent",
                "60%",
            ]),
            reasons: strings(&[
                "Moisture load increase or chilled water coil not providing sufficient dehumidification.",
                "Hot water reheat not available when required for dehumidification.",
                "Outside air enthalpy too high so economizer can't help.",
            ]),
            actions: strings(&[
                "Check chilled water valve position and leaving coil temperature.",
                "Verify hot water heating system availability (required for reheat during dehumidification).",
                "If alarm prevents dehumid mode due to hot water system off, generate BAS alarm per SOO.",
            ]),
            severity: Severity::Warning,
        },
        AlarmCategory {
            id: "night_purge_not_permitted".to_string(),
            keywords: strings(&[
                "night purge",
                "purge",
                "purging",
                "night purge",
            ]),
            reasons: strings(&[
                "Outdoor conditions do not satisfy night purge enthalpy criteria.",
                "Damper or control scheduling preventing night purge.",
                "Outside air actuator fault.",
            ]),
            actions: strings(&[
                "Check outdoor air enthalpy vs indoor enthalpy and night purge schedule.",
                "Verify damper positions and that purge window (4 to 2 hours before occupancy) is enabled.",
            ]),
            severity: Severity::Informational,
        },
        AlarmCategory {
            id: "sensors_lost".to_string(),
            keywords: strings(&[
                "sensor",
                "reading",
                "no reading",
                "na",
                "failed sensor",
                "disconnected",
            ]),
            reasons: strings(&[
                "Sensor failure or wiring/communication issue.",
                "Sensor out of range or uncalibrated.",
                "BAS point mapping changed or device offline.",
            ]),
            actions: strings(&[
                "Identify which sensor is reporting invalid; check wiring and device status.",
                "Replace or recalibrate sensor as necessary.",
                "Confirm BACnet/device communication is healthy.",
            ]),
            severity: Severity::Warning,
        },
        AlarmCategory {
            id: "short_cycle_protection".to_string(),
            keywords: strings(&[
                "short cycle",
                "short-cycling",
                "min run",
                "min off",
                "prevent short",
            ]),
            reasons: strings(&[
                "Unit cycling because setpoints or scheduling causing frequent starts/stops.",
                "Control deadband too narrow or sensor noise.",
            ]),
            actions: strings(&[
                "Check minimum run and off timers (user adjustable).",
                "Increase deadband or adjust hysteresis to prevent nuisance cycling.",
            ]),
            severity: Severity::Informational,
        },
    ]
}
