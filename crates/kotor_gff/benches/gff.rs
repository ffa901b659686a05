use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn get_input() -> Vec<u8> {
    std::fs::read(format!(
        "{}/resources/footlocker.utp",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

pub mod read {
    use divan::Bencher;
    use kotor_gff::templates::{Template, Utp};
    use kotor_gff::Gff;

    #[divan::bench]
    fn decode(bencher: Bencher) {
        bencher.with_inputs(super::get_input).bench_refs(|data| {
            divan::black_box(Gff::decode(data).unwrap());
        });
    }

    #[divan::bench]
    fn decode_template(bencher: Bencher) {
        bencher.with_inputs(super::get_input).bench_refs(|data| {
            let placeable = Utp::decode(data).unwrap();
            divan::black_box(placeable.items().unwrap());
        });
    }
}

pub mod write {
    use divan::Bencher;
    use kotor_gff::{Gff, GffValue};

    #[divan::bench]
    fn encode(bencher: Bencher) {
        bencher
            .with_inputs(|| Gff::decode(&super::get_input()).unwrap())
            .bench_refs(|gff| {
                divan::black_box(gff.encode().unwrap());
            });
    }

    #[divan::bench(args = [10, 100, 1000])]
    fn encode_list(bencher: Bencher, count: u32) {
        let mut gff = Gff::default();
        for index in 0..count {
            gff.root
                .add_list_element("ItemList", index)
                .unwrap()
                .set_field("Repos_PosX", GffValue::Word(index as u16));
        }

        bencher.bench_local(|| {
            divan::black_box(gff.encode().unwrap());
        });
    }
}
