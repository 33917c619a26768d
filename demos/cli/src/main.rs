use std::path::PathBuf;

use anyhow::Context;
use attendance_core::{format_display_date, format_percentage, DashboardConfig, PatientOrder};
use attendance_sheet::{sort_patients, summarize_csv_bytes};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "attendance-cli",
    about = "Tạo dashboard chuyên cần từ file CSV lịch hẹn (phân tách bằng ';')."
)]
struct Args {
    /// Đường dẫn tới file CSV.
    #[arg(short, long)]
    input: PathBuf,

    /// In toàn bộ snapshot dạng JSON.
    #[arg(long)]
    json: bool,

    /// Cột dự phòng cho trạng thái khi không header nào khớp.
    #[arg(long, conflicts_with = "no_fallback")]
    fallback_index: Option<usize>,

    /// Tắt cột trạng thái dự phòng.
    #[arg(long)]
    no_fallback: bool,

    /// Thứ tự danh sách bệnh nhân.
    #[arg(long, value_enum, default_value_t = SortArg::NameAsc)]
    sort: SortArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    NameAsc,
    NameDesc,
    RateAsc,
    RateDesc,
    Total,
}

impl From<SortArg> for PatientOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::NameAsc => PatientOrder::NameAsc,
            SortArg::NameDesc => PatientOrder::NameDesc,
            SortArg::RateAsc => PatientOrder::AttendanceRateAsc,
            SortArg::RateDesc => PatientOrder::AttendanceRateDesc,
            SortArg::Total => PatientOrder::TotalAppointmentsDesc,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let data = std::fs::read(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;
    tracing::debug!(path = %args.input.display(), bytes = data.len(), "Đã đọc file CSV");

    let mut config = DashboardConfig::default();
    if let Some(index) = args.fallback_index {
        config.status_fallback_index = Some(index);
    }
    if args.no_fallback {
        config.status_fallback_index = None;
    }

    let mut snapshot = summarize_csv_bytes(&data, &config)
        .with_context(|| format!("Không tổng hợp được {:?}", args.input))?;
    sort_patients(&mut snapshot.patients, args.sort.into());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let stats = &snapshot.stats;
    println!(
        "Generated at: {}\nStatus column: {}\nAppointments: {}\nAbsences: {}\nOverall attendance: {}\nPatients: {}\nPerfect attendance: {} ({})",
        snapshot.generated_at,
        snapshot.status_column,
        stats.total_appointments,
        stats.total_absences,
        format_percentage(stats.overall_attendance_rate),
        stats.total_patients,
        stats.perfect_attendance,
        format_percentage(stats.attendance_rate),
    );

    for patient in &snapshot.patients {
        println!(
            "  {} | total {} | atendido {} | cancelado {} | desmarcado {} | {} | {}",
            patient.name,
            patient.total_appointments,
            patient.atendido_count,
            patient.cancelado_count,
            patient.desmarcado_count,
            format_percentage(patient.attendance_rate()),
            format_display_date(&patient.last_appointment),
        );
    }

    Ok(())
}
