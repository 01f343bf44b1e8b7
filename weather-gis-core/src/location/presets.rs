//! Built-in places: every province and centrally-governed city, grouped the
//! way the province picker shows them.

use std::{collections::HashMap, sync::LazyLock};

use super::normalize_place_name;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub name: &'static str,
    pub places: &'static [Preset],
}

const fn place(name: &'static str, latitude: f64, longitude: f64) -> Preset {
    Preset { name, latitude, longitude }
}

pub static REGIONS: &[Region] = &[
    Region {
        name: "Đông Bắc Bộ",
        places: &[
            place("Hà Giang", 22.8233, 104.9836),
            place("Cao Bằng", 22.6657, 106.2570),
            place("Bắc Kạn", 22.1473, 105.8348),
            place("Tuyên Quang", 21.8233, 105.2180),
            place("Thái Nguyên", 21.5942, 105.8482),
            place("Lạng Sơn", 21.8537, 106.7615),
            place("Quảng Ninh", 20.9510, 107.0734),
            place("Bắc Giang", 21.2731, 106.1946),
            place("Phú Thọ", 21.3227, 105.4020),
        ],
    },
    Region {
        name: "Tây Bắc Bộ",
        places: &[
            place("Lào Cai", 22.4856, 103.9707),
            place("Điện Biên", 21.3860, 103.0230),
            place("Lai Châu", 22.3964, 103.4582),
            place("Sơn La", 21.3256, 103.9188),
            place("Yên Bái", 21.7229, 104.9113),
            place("Hoà Bình", 20.8172, 105.3376),
        ],
    },
    Region {
        name: "Đồng Bằng Sông Hồng",
        places: &[
            place("Hà Nội", 21.0285, 105.8542),
            place("Vĩnh Phúc", 21.3089, 105.6049),
            place("Bắc Ninh", 21.1861, 106.0763),
            place("Hải Dương", 20.9373, 106.3146),
            place("Hải Phòng", 20.8449, 106.6881),
            place("Hưng Yên", 20.6464, 106.0511),
            place("Thái Bình", 20.4463, 106.3366),
            place("Hà Nam", 20.5835, 105.9230),
            place("Nam Định", 20.4388, 106.1621),
            place("Ninh Bình", 20.2506, 105.9745),
        ],
    },
    Region {
        name: "Bắc Trung Bộ",
        places: &[
            place("Thanh Hoá", 19.8067, 105.7852),
            place("Nghệ An", 18.6796, 105.6813),
            place("Hà Tĩnh", 18.3428, 105.9057),
            place("Quảng Bình", 17.4689, 106.6223),
            place("Quảng Trị", 16.8163, 107.1003),
            place("Thừa Thiên - Huế", 16.4637, 107.5909),
        ],
    },
    Region {
        name: "Nam Trung Bộ",
        places: &[
            place("Đà Nẵng", 16.0544, 108.2022),
            place("Hoàng Sa", 16.5000, 112.0000),
            place("Quảng Nam", 15.5736, 108.4740),
            place("Quảng Ngãi", 15.1214, 108.8044),
            place("Bình Định", 13.7830, 109.2197),
            place("Phú Yên", 13.0882, 109.0929),
            place("Khánh Hoà", 12.2388, 109.1967),
            place("Trường Sa", 8.6445, 111.9205),
            place("Ninh Thuận", 11.5643, 108.9886),
            place("Bình Thuận", 10.9289, 108.1021),
        ],
    },
    Region {
        name: "Tây Nguyên",
        places: &[
            place("Kon Tum", 14.3498, 108.0005),
            place("Gia Lai", 13.9833, 108.0000),
            place("Đắk Lắk", 12.6667, 108.0500),
            place("Đắk Nông", 12.0045, 107.6874),
            place("Lâm Đồng", 11.9404, 108.4583),
        ],
    },
    Region {
        name: "Đông Nam Bộ",
        places: &[
            place("Bình Phước", 11.5349, 106.8823),
            place("Tây Ninh", 11.3351, 106.1099),
            place("Bình Dương", 10.9804, 106.6519),
            place("Đồng Nai", 10.9574, 106.8426),
            place("Bà Rịa - Vũng Tàu", 10.3460, 107.0843),
            place("Hồ Chí Minh", 10.76, 106.66),
        ],
    },
    Region {
        name: "Đồng Bằng Sông Cửu Long",
        places: &[
            place("Long An", 10.5360, 106.4137),
            place("Tiền Giang", 10.3600, 106.3600),
            place("Bến Tre", 10.2434, 106.3756),
            place("Trà Vinh", 9.9347, 106.3453),
            place("Vĩnh Long", 10.2537, 105.9722),
            place("Đồng Tháp", 10.4602, 105.6329),
            place("An Giang", 10.3866, 105.4352),
            place("Kiên Giang", 10.0125, 105.0809),
            place("Cần Thơ", 10.0452, 105.7469),
            place("Hậu Giang", 9.7845, 105.4701),
            place("Sóc Trăng", 9.6025, 105.9739),
            place("Bạc Liêu", 9.2941, 105.7278),
            place("Cà Mau", 9.1769, 105.1524),
            place("Phú Quốc", 10.2899, 103.9840),
        ],
    },
];

/// Alternative spellings, already normalized, pointing at a normalized preset key.
static ALIASES: &[(&str, &str)] = &[
    ("TPHCM", "HO CHI MINH"),
    ("TP HCM", "HO CHI MINH"),
    ("HCM", "HO CHI MINH"),
    ("SAI GON", "HO CHI MINH"),
    ("SAIGON", "HO CHI MINH"),
    ("THANH PHO HO CHI MINH", "HO CHI MINH"),
    ("HANOI", "HA NOI"),
    ("DANANG", "DA NANG"),
    ("HUE", "THUA THIEN HUE"),
    ("VUNG TAU", "BA RIA VUNG TAU"),
];

static INDEX: LazyLock<HashMap<String, &'static Preset>> = LazyLock::new(|| {
    let mut index: HashMap<String, &'static Preset> = REGIONS
        .iter()
        .flat_map(|region| region.places.iter())
        .map(|preset| (normalize_place_name(preset.name), preset))
        .collect();

    for (alias, target) in ALIASES {
        if let Some(preset) = index.get(*target).copied() {
            index.insert((*alias).to_string(), preset);
        }
    }

    index
});

/// Exact lookup by normalized key.
pub fn lookup(key: &str) -> Option<&'static Preset> {
    INDEX.get(key).copied()
}

pub fn all() -> impl Iterator<Item = &'static Preset> {
    REGIONS.iter().flat_map(|region| region.places.iter())
}
