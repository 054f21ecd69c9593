//! External reading list, grouped by agency.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Source {
    #[serde(rename = "NASA")]
    Nasa,
    #[serde(rename = "NOAA")]
    Noaa,
    #[serde(rename = "CSA")]
    Csa,
    #[serde(rename = "AEB")]
    Aeb,
    Other,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Nasa => "NASA",
            Source::Noaa => "NOAA",
            Source::Csa => "CSA",
            Source::Aeb => "AEB",
            Source::Other => "Other",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceCategory {
    pub id: &'static str,
    pub title: &'static str,
    pub items: &'static [Resource],
}

pub static RESOURCE_CATEGORIES: [ResourceCategory; 4] = [
    ResourceCategory {
        id: "nasa",
        title: "NASA",
        items: &[
            Resource {
                title: "NASA Space Weather Website",
                description: "Panorama general del clima espacial y el programa de NASA para apoyar a comunidades afectadas.",
                url: "https://science.nasa.gov/heliophysics/space-weather/",
                source: Source::Nasa,
            },
            Resource {
                title: "Solar Storms and Flares",
                description: "Explicación de fenómenos: erupciones solares, eyecciones de masa coronal y ciclo solar.",
                url: "https://science.nasa.gov/sun/solar-flares/",
                source: Source::Nasa,
            },
            Resource {
                title: "Space Weather Centers of Excellence",
                description: "Tres proyectos centrados en mitigar impactos del clima espacial en activos espaciales.",
                url: "https://science.nasa.gov/heliophysics/programs/",
                source: Source::Nasa,
            },
            Resource {
                title: "NASA Heliophysics Fleet",
                description: "Visualización de la flota de misiones heliosféricas actuales de NASA.",
                url: "https://science.nasa.gov/heliophysics/fleet/",
                source: Source::Nasa,
            },
            Resource {
                title: "NASA Space Weather (Visión general)",
                description: "Información de referencia sobre clima espacial en NASA Science (inglés).",
                url: "https://science.nasa.gov/space-weather/",
                source: Source::Nasa,
            },
        ],
    },
    ResourceCategory {
        id: "noaa",
        title: "NOAA",
        items: &[
            Resource {
                title: "NOAA SWPC",
                description: "Centro de Predicción del Clima Espacial: pronósticos y datos operativos.",
                url: "https://www.swpc.noaa.gov/",
                source: Source::Noaa,
            },
            Resource {
                title: "Five Things: Space Weather",
                description: "Cinco claves sobre el clima espacial y su observación.",
                url: "https://www.noaa.gov/education/resource-collections/space-weather/five-things-space-weather",
                source: Source::Noaa,
            },
            Resource {
                title: "Guía ciclo solar y clima espacial (NESDIS)",
                description: "Introducción al ciclo solar y recursos educativos.",
                url: "https://www.nesdis.noaa.gov/una-guia-sobre-el-ciclo-solar-y-el-clima-espacial",
                source: Source::Noaa,
            },
        ],
    },
    ResourceCategory {
        id: "csa",
        title: "CSA (Canadá)",
        items: &[
            Resource {
                title: "Space Weather Canada",
                description: "Condiciones actuales, datos y servicios; recursos para aprender más.",
                url: "https://spaceweather.gc.ca/",
                source: Source::Csa,
            },
            Resource {
                title: "Space Weather over Canada",
                description: "Información sobre la importancia del pronóstico y su impacto en tecnología y vida diaria.",
                url: "https://www.asc-csa.gc.ca/eng/astronomy/space-weather.asp",
                source: Source::Csa,
            },
        ],
    },
    ResourceCategory {
        id: "aeb",
        title: "AEB (Brasil)",
        items: &[Resource {
            title: "EMBRACE - Programa Brasileño de Clima Espacial",
            description: "Plataforma con datos en tiempo real, archivos históricos y modelos de pronóstico.",
            url: "https://www2.inpe.br/climaespacial/",
            source: Source::Aeb,
        }],
    },
];

pub fn category(id: &str) -> Option<&'static ResourceCategory> {
    RESOURCE_CATEGORIES.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let ids: Vec<_> = RESOURCE_CATEGORIES.iter().map(|c| c.id).collect();
        assert_eq!(ids, ["nasa", "noaa", "csa", "aeb"]);

        let sizes: Vec<_> = RESOURCE_CATEGORIES.iter().map(|c| c.items.len()).collect();
        assert_eq!(sizes, [5, 3, 2, 1]);
    }

    #[test]
    fn test_items_match_their_category() {
        for cat in &RESOURCE_CATEGORIES {
            for item in cat.items {
                assert!(item.url.starts_with("https://"), "{}", item.url);
                assert!(
                    cat.title.starts_with(&item.source.to_string()),
                    "{} listed under {}",
                    item.title,
                    cat.title
                );
            }
        }
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(category("csa").map(|c| c.title), Some("CSA (Canadá)"));
        assert!(category("esa").is_none());
    }
}
