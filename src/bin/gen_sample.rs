//! gen_sample.rs
//! Escribe data/michelin_sample.csv con unas pocas filas con la misma forma que
//! el CSV real, para arrancar el servicio sin red:
//!   DATA_SOURCE=data/michelin_sample.csv cargo run
//! Uso: cargo run --bin gen_sample

use std::fs;

const OUT_CSV: &str = "data/michelin_sample.csv";

const HEADER: [&str; 13] = [
    "Name", "Address", "Location", "Price", "Cuisine", "Longitude", "Latitude",
    "PhoneNumber", "Url", "WebsiteUrl", "Award", "FacilitiesAndServices", "Description",
];

fn main() -> anyhow::Result<()> {
    // (nombre, dirección, location, precio, cocina, lon, lat, award, servicios, descripción)
    let rows = [
        ("Le Pré Catelan", "Bois de Boulogne", "Paris, France", "€€€€", "Modern Cuisine, Creative",
         2.2508, 48.8633, "3 Stars", "Air conditioning,Terrace,Valet parking", "Pavillon Napoléon III"),
        ("Paul Bocuse", "40 quai de la Plage", "Collonges-au-Mont-d'Or, France", "€€€€", "Classic French",
         4.8447, 45.8188, "2 Stars", "Car park,Garden or park", "L'auberge du Pont de Collonges"),
        ("Le Canut et les Gones", "29 rue de Belfort", "Lyon, France", "€€", "Modern Cuisine",
         4.8270, 45.7766, "Bib Gourmand", "", "Bistrot de la Croix-Rousse"),
        ("Takao Takano", "33 rue Malesherbes", "Lyon, France", "€€€", "Creative",
         4.8477, 45.7702, "2 Stars", "Air conditioning", "Cocina precisa y delicada"),
        ("Disfrutar", "Carrer de Villarroel, 163", "Barcelona, Spain", "€€€€", "Creative",
         2.1549, 41.3878, "3 Stars", "Air conditioning,Wheelchair access", "Creatividad sin límites"),
        ("La Mar Salada", "Passeig Joan de Borbó, 58", "Barcelona, Spain", "€€", "Seafood, Mediterranean Cuisine",
         2.1887, 41.3801, "Bib Gourmand", "Terrace", "Arroces y pescado"),
        ("Le Bernardin", "155 W. 51st St.", "New York, USA", "$$$$", "Seafood, French",
         -73.9817, 40.7615, "3 Stars", "Air conditioning", "Seafood temple"),
        ("Cote", "16 W. 22nd St.", "New York, USA", "$$$", "Korean, Steakhouse",
         -73.9922, 40.7417, "1 Star", "Air conditioning,Counter dining", "Korean steakhouse"),
        ("Hometown Bar-B-Que", "454 Van Brunt St.", "New York, USA", "$$", "Barbecue, American",
         -74.0149, 40.6751, "Selected Restaurants", "Terrace", "Smoked meats"),
    ];

    fs::create_dir_all("data")?;
    let mut w = csv::Writer::from_path(OUT_CSV)?;
    w.write_record(HEADER)?;
    for (i, (name, addr, loc, price, cuisine, lon, lat, award, services, desc)) in rows.iter().enumerate() {
        w.write_record([
            name.to_string(),
            addr.to_string(),
            loc.to_string(),
            price.to_string(),
            cuisine.to_string(),
            format!("{lon:.4}"),
            format!("{lat:.4}"),
            String::new(),
            format!("https://guide.michelin.com/sample/{i}"),
            String::new(),
            award.to_string(),
            services.to_string(),
            desc.to_string(),
        ])?;
    }
    w.flush()?;
    println!("OK -> {OUT_CSV} ({} filas)", rows.len());
    Ok(())
}
