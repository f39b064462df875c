use rectpack::{InputItem, Packer, Strategy};

fn main() {
    env_logger::init();

    let inputs: Vec<_> = (0..5).map(|_| InputItem::new((128, 128))).collect();

    for &strategy in &[Strategy::Guillotine, Strategy::MaxRectsBestAreaFit] {
        let result = Packer::new(strategy).pack(inputs.clone());

        println!("{:?} result: {:#?}", strategy, result);
    }
}
