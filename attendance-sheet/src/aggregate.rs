//! Status tally, per-patient statistics and dashboard KPIs.

use std::collections::{hash_map::Entry, HashMap};

use attendance_core::{
    is_tracked_status, percentage, tally_label, DashboardStats, PatientOrder, PatientStat, Record,
    StatusCategory, StatusTally, ABSENT_LABEL, ATTENDED_LABEL,
};

const PATIENT_COLUMNS: [&str; 2] = ["Paciente", "Nome do Paciente"];
const UNKNOWN_PATIENT: &str = "Paciente não identificado";
const PATIENT_STATUS_COLUMN: &str = "Status";
const APPOINTMENT_DATE_COLUMNS: [&str; 2] = ["Início previsto", "Data"];

/// Count records per trimmed status text.
pub fn analyze_status(records: &[Record], status_column: &str) -> StatusTally {
    let mut tally = StatusTally::default();
    for record in records {
        tally.increment(tally_label(record.get_or(status_column, "")));
    }
    tally
}

/// Group records by patient name and keep only qualifying patients.
///
/// The result keeps first-seen order, but callers should not rely on it and
/// sort with [`sort_patients`] instead.
pub fn calculate_patient_stats(records: &[Record]) -> Vec<PatientStat> {
    let mut accumulator = PatientAccumulator::default();
    for record in records {
        accumulator.handle_record(record);
    }
    accumulator.finalize()
}

/// Combine the tally and the patient set into the headline figures.
pub fn calculate_dashboard_stats(
    records: &[Record],
    tally: &StatusTally,
    patients: &[PatientStat],
) -> DashboardStats {
    let total_appointments = records.len();
    let total_patients = patients.len();
    let perfect_attendance = patients
        .iter()
        .filter(|patient| patient.has_perfect_attendance())
        .count();

    DashboardStats {
        total_appointments,
        total_absences: tally.count(ABSENT_LABEL),
        overall_attendance_rate: percentage(tally.count(ATTENDED_LABEL), total_appointments),
        total_patients,
        perfect_attendance,
        attendance_rate: percentage(perfect_attendance, total_patients),
    }
}

/// Sort patients in place. Ties fall back to the name so output is stable.
pub fn sort_patients(patients: &mut [PatientStat], order: PatientOrder) {
    patients.sort_by(|a, b| match order {
        PatientOrder::NameAsc => a.name.cmp(&b.name),
        PatientOrder::NameDesc => b.name.cmp(&a.name),
        PatientOrder::AttendanceRateAsc => a
            .attendance_rate()
            .total_cmp(&b.attendance_rate())
            .then_with(|| a.name.cmp(&b.name)),
        PatientOrder::AttendanceRateDesc => b
            .attendance_rate()
            .total_cmp(&a.attendance_rate())
            .then_with(|| a.name.cmp(&b.name)),
        PatientOrder::TotalAppointmentsDesc => b
            .total_appointments
            .cmp(&a.total_appointments)
            .then_with(|| a.name.cmp(&b.name)),
    });
}

#[derive(Default)]
struct PatientAccumulator {
    index: HashMap<String, usize>,
    patients: Vec<PatientStat>,
}

impl PatientAccumulator {
    fn handle_record(&mut self, record: &Record) {
        let name = record
            .first_non_empty(&PATIENT_COLUMNS)
            .unwrap_or(UNKNOWN_PATIENT);
        let status = record.get_or(PATIENT_STATUS_COLUMN, "").trim();
        let appointment_date = record
            .first_non_empty(&APPOINTMENT_DATE_COLUMNS)
            .unwrap_or("");

        let patient = self.patient_mut(name);

        if is_tracked_status(status) {
            patient.total_appointments += 1;
        }

        patient.statuses.push(status.to_string());

        if !appointment_date.is_empty() {
            patient.last_appointment = appointment_date.to_string();
        }

        match StatusCategory::classify(status) {
            StatusCategory::Attended => {
                patient.attendances += 1;
                patient.atendido_count += 1;
                patient.has_at_least_one_attended = true;
            }
            StatusCategory::Absent => patient.absences += 1,
            StatusCategory::Cancelled => {
                patient.cancellations += 1;
                patient.cancelado_count += 1;
            }
            StatusCategory::TherapistCancelled => patient.desmarcado_count += 1,
            StatusCategory::Unclassified => {}
        }
    }

    fn patient_mut(&mut self, name: &str) -> &mut PatientStat {
        let position = match self.index.entry(name.to_string()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                self.patients.push(PatientStat::new(name));
                *entry.insert(self.patients.len() - 1)
            }
        };
        &mut self.patients[position]
    }

    fn finalize(self) -> Vec<PatientStat> {
        let seen = self.patients.len();
        let qualifying: Vec<PatientStat> = self
            .patients
            .into_iter()
            .filter(PatientStat::is_qualifying)
            .collect();

        tracing::debug!(
            seen,
            qualifying = qualifying.len(),
            "Patient statistics aggregated"
        );
        qualifying
    }
}
