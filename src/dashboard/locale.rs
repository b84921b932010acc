use crate::dashboard::view_state::AnalysisTab;
use crate::models::{AirQualityCategory, Measure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Display language. Only user-facing text varies between locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[serde(alias = "en")]
    #[value(alias = "en")]
    English,
    #[serde(alias = "id")]
    #[value(alias = "id")]
    Indonesian,
}

/// Fixed display text for one locale.
#[derive(Debug)]
pub struct Strings {
    pub app_title: &'static str,
    pub app_intro: &'static str,
    pub analyses_heading: &'static str,
    pub analyses: [&'static str; 4],
    pub call_to_action: &'static str,
    pub analysis_title: &'static str,
    pub station_label: &'static str,
    pub year_label: &'static str,
    pub trend_heading: &'static str,
    pub trend_question: &'static str,
    pub correlation_heading: &'static str,
    pub correlation_question: &'static str,
    pub average_heading: &'static str,
    pub average_question: &'static str,
    pub highest_pollution: &'static str,
    pub classification_heading: &'static str,
    pub legend_heading: &'static str,
    pub legend_columns: [&'static str; 4],
    pub category_label: &'static str,
    pub no_data: &'static str,
    pub unavailable: &'static str,
    pub rows_shown: &'static str,
}

const ENGLISH: Strings = Strings {
    app_title: "Air Quality Dashboard",
    app_intro: "This application analyzes air quality based on the available dataset. \
                With this dashboard you can explore the patterns and factors that influence air quality.",
    analyses_heading: "Available analyses:",
    analyses: [
        "Pollutant trends per city: how PM2.5, PM10, NO2 and O3 change over time.",
        "Weather & pollution correlation: how temperature, dew point and rain relate to pollution levels.",
        "Average air pollution per city: compare average pollution across locations.",
        "Air quality classification: PM2.5-based categories to evaluate pollution in each city.",
    ],
    call_to_action: "Ready to start? Open the analysis page.",
    analysis_title: "Data Analysis",
    station_label: "City",
    year_label: "Year",
    trend_heading: "Pollutant Trends per City",
    trend_question: "Question 1: How did air quality (PM2.5, PM10, NO2, O3) change from year to year in each city?",
    correlation_heading: "Weather & Pollution Correlation",
    correlation_question: "Question 2: How do temperature (TEMP), dew point (DEWP) and rainfall (RAIN) affect pollution levels in each city?",
    average_heading: "Average Air Pollution per City",
    average_question: "Question 3: Based on the data, which city has the highest level of air pollution?",
    highest_pollution: "Highest average PM2.5",
    classification_heading: "City Air Quality Classification by PM2.5 (manual grouping)",
    legend_heading: "Legend",
    legend_columns: ["Category", "PM2.5 Range (µg/m³)", "Color", "Meaning"],
    category_label: "Air Quality Category",
    no_data: "No data",
    unavailable: "unavailable",
    rows_shown: "rows shown",
};

const INDONESIAN: Strings = Strings {
    app_title: "Air Quality Dashboard",
    app_intro: "Aplikasi ini bertujuan untuk menganalisis kualitas udara berdasarkan dataset yang tersedia. \
                Dengan dashboard ini, pengguna dapat memahami berbagai pola dan faktor yang mempengaruhi kualitas udara.",
    analyses_heading: "Jenis Analisis yang Tersedia:",
    analyses: [
        "Tren Polutan di Tiap Kota: Melihat perubahan polutan seperti PM2.5, PM10, NO2, dan O3 dari waktu ke waktu.",
        "Korelasi Faktor Cuaca & Polusi: Menganalisis hubungan antara suhu, kelembaban, dan tingkat polusi.",
        "Rata-rata Polusi Udara per Kota: Menampilkan perbandingan rata-rata polusi di berbagai lokasi.",
        "Klasifikasi Kualitas Udara: Menggunakan kategori kualitas udara berdasarkan tingkat PM2.5 untuk mengevaluasi tingkat polusi di setiap kota.",
    ],
    call_to_action: "Siap untuk mulai? Buka halaman Analisis Data!",
    analysis_title: "Analisis Data",
    station_label: "Kota",
    year_label: "Tahun",
    trend_heading: "Tren Polutan di Tiap Kota",
    trend_question: "Pertanyaan 1: Bagaimana pola perubahan kualitas udara (PM2.5, PM10, NO2, O3) di tiga kota dari tahun ke tahun?",
    correlation_heading: "Korelasi Faktor Cuaca & Polusi",
    correlation_question: "Pertanyaan 2: Bagaimana pengaruh suhu (TEMP), kelembaban (DEWP), dan curah hujan (RAIN) terhadap tingkat polusi udara di tiga kota?",
    average_heading: "Rata-rata Polusi Udara per Kota",
    average_question: "Pertanyaan 3: Berdasarkan pada data yang ada, kota manakah yang memiliki tingkat polusi udara tertinggi?",
    highest_pollution: "Rata-rata PM2.5 tertinggi",
    classification_heading: "Klasifikasi Kualitas Udara Kota Berdasarkan PM2.5 dengan Pendekatan Clustering (Manual Grouping)",
    legend_heading: "Keterangan",
    legend_columns: ["Kategori", "Rentang PM2.5 (µg/m³)", "Warna", "Makna"],
    category_label: "Kategori Kualitas Udara",
    no_data: "Tidak ada data",
    unavailable: "tidak tersedia",
    rows_shown: "baris ditampilkan",
};

impl Locale {
    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::English => &ENGLISH,
            Locale::Indonesian => &INDONESIAN,
        }
    }

    pub fn tab_title(&self, tab: AnalysisTab) -> &'static str {
        match (self, tab) {
            (_, AnalysisTab::Data) => "Data Table",
            (_, AnalysisTab::Analysis) => "Q1-Q3 Analysis",
            (Locale::English, AnalysisTab::Classification) => "Air Quality Classification",
            (Locale::Indonesian, AnalysisTab::Classification) => "Klasifikasi Kualitas Udara",
        }
    }

    pub fn trend_chart_title(&self, measure: &str) -> String {
        match self {
            Locale::English => format!("{} trend by year", measure),
            Locale::Indonesian => format!("Tren {} dari Tahun ke Tahun", measure),
        }
    }

    pub fn correlation_title(&self, station: &str) -> String {
        match self {
            Locale::English => format!("Weather & air pollution correlation in {}", station),
            Locale::Indonesian => format!("Korelasi Faktor Cuaca & Polusi Udara di {}", station),
        }
    }

    pub fn weather_driver(&self, pollutant: Measure, factor: Measure, r: f64) -> String {
        match self {
            Locale::English => format!("{} follows {} most closely (r = {:.2})", pollutant, factor, r),
            Locale::Indonesian => format!("{} paling dipengaruhi oleh {} (r = {:.2})", pollutant, factor, r),
        }
    }

    pub fn classification_title(&self, station: &str) -> String {
        match self {
            Locale::English => format!("Air quality (PM2.5) in {} per year", station),
            Locale::Indonesian => format!("Kualitas Udara (PM2.5) di {} per Tahun", station),
        }
    }

    pub fn color_name(&self, category: AirQualityCategory) -> &'static str {
        use AirQualityCategory::*;
        match (self, category) {
            (Locale::English, Excellent) => "Blue",
            (Locale::English, Good) => "Green",
            (Locale::English, LightlyPolluted) => "Yellow",
            (Locale::English, ModeratelyPolluted) => "Orange",
            (Locale::English, HeavilyPolluted) => "Red",
            (Locale::English, SeverelyPolluted) => "Dark Red",
            (Locale::Indonesian, Excellent) => "Biru",
            (Locale::Indonesian, Good) => "Hijau",
            (Locale::Indonesian, LightlyPolluted) => "Kuning",
            (Locale::Indonesian, ModeratelyPolluted) => "Oranye",
            (Locale::Indonesian, HeavilyPolluted) => "Merah",
            (Locale::Indonesian, SeverelyPolluted) => "Merah Tua",
        }
    }

    pub fn category_meaning(&self, category: AirQualityCategory) -> &'static str {
        use AirQualityCategory::*;
        match (self, category) {
            (Locale::English, Excellent) => "Very good air quality, almost no pollution.",
            (Locale::English, Good) => "Air is in good condition and safe for outdoor activities.",
            (Locale::English, LightlyPolluted) => "Some pollution, still acceptable for most people.",
            (Locale::English, ModeratelyPolluted) => "Moderate pollution; may affect sensitive groups such as children and the elderly.",
            (Locale::English, HeavilyPolluted) => "Poor air; may cause health effects for the general public.",
            (Locale::English, SeverelyPolluted) => "Very dangerous; air quality is very poor and may cause serious health impacts.",
            (Locale::Indonesian, Excellent) => "Kualitas udara sangat baik, hampir tidak ada polusi.",
            (Locale::Indonesian, Good) => "Udara dalam kondisi baik dan aman untuk aktivitas luar ruangan.",
            (Locale::Indonesian, LightlyPolluted) => "Ada sedikit polusi, tetapi masih dalam batas wajar untuk sebagian besar orang.",
            (Locale::Indonesian, ModeratelyPolluted) => "Polusi sedang, dapat mulai mempengaruhi kelompok sensitif seperti anak-anak dan lansia.",
            (Locale::Indonesian, HeavilyPolluted) => "Udara dalam kondisi buruk, dapat menyebabkan efek kesehatan bagi masyarakat umum.",
            (Locale::Indonesian, SeverelyPolluted) => "Sangat berbahaya, kualitas udara sangat buruk dan dapat menyebabkan dampak kesehatan yang serius.",
        }
    }
}
