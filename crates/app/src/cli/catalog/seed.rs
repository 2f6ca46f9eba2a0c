use clap::Args;
use storefront_app::{
    database::{self, Db},
    domain::products::{
        PgProductsService, ProductsService, data::NewProduct, records::ProductUuid,
    },
};

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

struct SampleProduct {
    name: &'static str,
    description: &'static str,
    price: u64,
    category: &'static str,
    stock: u32,
    image: &'static str,
}

const SAMPLE_PRODUCTS: [SampleProduct; 5] = [
    SampleProduct {
        name: "Wireless Headphones",
        description: "Bluetooth over-ear headphones with noise cancellation and 30-hour battery life.",
        price: 2999,
        category: "electronics",
        stock: 40,
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=600&auto=format&fit=crop&q=60",
    },
    SampleProduct {
        name: "Smart Watch",
        description: "Fitness tracking, heart rate monitor, and notifications on your wrist.",
        price: 4999,
        category: "electronics",
        stock: 30,
        image: "https://images.unsplash.com/photo-1508685096489-7aacd43bd3b1?w=600&auto=format&fit=crop&q=60",
    },
    SampleProduct {
        name: "DSLR Camera",
        description: "24MP DSLR camera with 18-55mm lens kit, perfect for beginners and enthusiasts.",
        price: 35999,
        category: "electronics",
        stock: 15,
        image: "https://media.istockphoto.com/id/1494050217/photo/isolated-slr-camera-on-white-background-suitable-for-your-device-concept.webp",
    },
    SampleProduct {
        name: "Gaming Mouse",
        description: "Ergonomic RGB gaming mouse with 7 programmable buttons and adjustable DPI.",
        price: 1499,
        category: "electronics",
        stock: 50,
        image: "https://images.unsplash.com/photo-1628832307345-7404b47f1751?w=600&auto=format&fit=crop&q=60",
    },
    SampleProduct {
        name: "Laptop Backpack",
        description: "Water-resistant backpack with padded laptop compartment and USB charging port.",
        price: 899,
        category: "accessories",
        stock: 35,
        image: "https://images.unsplash.com/photo-1667411424771-cadd97150827?w=600&auto=format&fit=crop&q=60",
    },
];

pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgProductsService::new(Db::new(pool));

    for sample in &SAMPLE_PRODUCTS {
        let product = service
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: sample.name.to_string(),
                description: sample.description.to_string(),
                price: sample.price,
                category: sample.category.to_string(),
                stock: sample.stock,
                images: vec![sample.image.to_string()],
            })
            .await
            .map_err(|error| format!("failed to create product {}: {error}", sample.name))?;

        println!("created product {} ({})", product.name, product.uuid);
    }

    println!("seeded {} products", SAMPLE_PRODUCTS.len());

    Ok(())
}
